// src/handler.rs

//! HTTP request boundary.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::error::AppError;
use crate::models::Config;
use crate::pipeline::{ScrapeData, ScrapeRequest, run_scrape};

/// Application state shared across handlers.
pub struct AppState {
    pub config: Arc<Config>,
}

/// Response envelope for a batch scrape.
#[derive(Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub data: ScrapeData,
}

/// GET / - health check.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// POST /scrape - fetch recent reviews for the listed store URLs.
///
/// Per-source failures are already converted to empty lists inside the
/// pipeline; an error here means the batch itself failed and becomes a 500.
pub async fn scrape(
    state: web::Data<AppState>,
    body: web::Json<ScrapeRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    log::info!(
        "Scrape request: {} Apple URL(s), {} Google Play URL(s)",
        request.apple_store.len(),
        request.google_play.len()
    );

    let data = run_scrape(Arc::clone(&state.config), &request).await?;

    Ok(HttpResponse::Ok().json(ScrapeResponse {
        success: true,
        data,
    }))
}

/// Register routes on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health))
        .route("/scrape", web::post().to(scrape));
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};

    use super::*;

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            config: Arc::new(Config::default()),
        })
    }

    #[actix_web::test]
    async fn test_health() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure)).await;
        let request = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_scrape_empty_request() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure)).await;
        let request = test::TestRequest::post()
            .uri("/scrape")
            .set_json(serde_json::json!({}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["ios"], serde_json::json!({}));
        assert_eq!(body["data"]["android"], serde_json::json!({}));
    }

    #[actix_web::test]
    async fn test_scrape_malformed_google_url_returns_empty_entry() {
        let app =
            test::init_service(App::new().app_data(test_state()).configure(configure)).await;
        let request = test::TestRequest::post()
            .uri("/scrape")
            .set_json(serde_json::json!({
                "googlePlay": ["https://play.google.com/store/apps/details?foo=1"]
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"]["android"]["https://play.google.com/store/apps/details?foo=1"],
            serde_json::json!([])
        );
    }
}
