use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::pricing::PriceAdvisor;

mod handlers;
pub mod request;
pub mod response;

/// Read-only state shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub advisor: PriceAdvisor,
    pub environment: String,
    pub debug: bool,
}

impl AppState {
    pub fn new(advisor: PriceAdvisor, config: &Config) -> Self {
        Self {
            advisor,
            environment: config.environment.clone(),
            debug: config.debug,
        }
    }
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/test", get(handlers::handle_test))
        .route("/test-gemini", get(handlers::handle_test_gemini))
        .route(
            "/api/price-suggestion",
            get(handlers::handle_price_suggestion_query)
                .post(handlers::handle_price_suggestion_body),
        )
        .route(
            "/api/ai-price-suggestion",
            post(handlers::handle_ai_price_suggestion),
        )
        .fallback(handlers::handle_not_found)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, err);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
