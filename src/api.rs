use crate::config::Config;
use crate::platforms::{list_platforms, Platform};
use crate::types::*;
use crate::{scrape, AppState, ScrapeError};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api", get(api_root))
        .route("/api/platforms", get(platforms_handler))
        .route("/api/scrape", get(scrape_handler))
        .route("/scrape", get(scrape_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy from `ALLOWED_ORIGINS`; origins that are not valid header values are skipped.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origins) = &config.allowed_origins else {
        return CorsLayer::permissive();
    };
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "price-scraper",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn api_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to Price Scraper API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "platforms": "/api/platforms",
            "scrape": "/api/scrape?platform=<platform>&url=<url>"
        }
    }))
}

async fn platforms_handler() -> Json<PlatformsResponse> {
    Json(PlatformsResponse {
        platforms: list_platforms(),
    })
}

fn status_for(err: &ScrapeError) -> StatusCode {
    match err {
        ScrapeError::UnsupportedPlatform(_) | ScrapeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ScrapeError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        ScrapeError::ScrapeFailure(_) | ScrapeError::ExtractionTask(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn scrape_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ScrapeParams>, QueryRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        warn!("Scrape rejected: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid query parameters: {}", rejection.body_text()),
            }),
        )
    })?;
    info!("Scrape request: platform={} url={}", params.platform, params.url);

    let result = match params.platform.parse::<Platform>() {
        Ok(platform) => scrape::scrape_platform(&state.fetcher, platform, &params.url)
            .await
            .map(|data| (platform, data)),
        Err(e) => Err(e),
    };

    match result {
        Ok((platform, data)) => Ok(Json(ScrapeResponse {
            success: true,
            platform,
            data,
        })),
        Err(e) => {
            if e.is_client_error() {
                warn!("Scrape rejected: {}", e);
            } else {
                error!("Scrape error: {}", e);
            }
            Err(error_response(&e))
        }
    }
}

fn error_response(err: &ScrapeError) -> ApiError {
    (
        status_for(err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
