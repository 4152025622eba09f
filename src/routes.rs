use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultOnFailure, TraceLayer},
};
use tracing::Level;

use crate::handlers;
use crate::middleware::access_guard_middleware;
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/health", get(handlers::health))
        // Asset ingress
        .merge(asset_routes(config.api.max_request_size_bytes))
        // Everything else is a page, behind the access guard
        .fallback_service(page_routes(&state))
        .with_state(state);

    // Global middleware
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        // 5xx is logged at ERROR by the handler that produced it
        let trace = TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG));
        router = router.layer(trace);
    }

    router
}

fn asset_routes(body_limit: usize) -> Router<AppState> {
    Router::new().route(
        "/api/upload-asset",
        post(handlers::upload_asset).layer(DefaultBodyLimit::max(body_limit)),
    )
}

/// Static SPA pages; unknown paths fall back to index.html so client routing works
fn page_routes(state: &AppState) -> Router {
    let dir = &state.config.pages.dir;
    let pages = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));

    Router::new()
        .fallback_service(pages)
        .layer(middleware::from_fn_with_state(state.clone(), access_guard_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}
