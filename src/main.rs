// src/main.rs

//! Review crawler HTTP server.
//!
//! Accepts batches of store listing URLs over POST /scrape and answers
//! with the newest reviews per store.

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use env_logger::Env;

use review_crawler::config::ServerConfig;
use review_crawler::error::Result;
use review_crawler::handler::{self, AppState};
use review_crawler::models::Config;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let server = ServerConfig::from_env()?;
    let config = Config::load_or_default(&server.config_path);
    config.validate()?;

    log::info!(
        "Starting review crawler on {}:{}",
        server.host,
        server.port
    );

    let state = web::Data::new(AppState {
        config: std::sync::Arc::new(config),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .configure(handler::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await?;

    Ok(())
}
