use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, put},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

mod health;
mod proxy;

pub fn router(state: AppState) -> Router {
    let max_body = state.config.max_body_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/proxy", put(proxy::store_blob))
        .route("/api/proxy/{blob_id}", get(proxy::fetch_blob))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// Browser callers need CORS; other clients don't care
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}
