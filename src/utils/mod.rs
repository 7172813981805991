//! Utility functions and helpers.

pub mod http;
pub mod lang;
pub mod retry;
pub mod url;
