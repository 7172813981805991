// src/lib.rs

//! Review Crawler Library
//!
//! Retrieves recent user reviews for a mobile app from the App Store and
//! Google Play, normalizes them into a common record, and returns the
//! newest per store.

pub mod config;
pub mod error;
pub mod handler;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
