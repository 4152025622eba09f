use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::GuardDecision;
use crate::state::AppState;

/// Access guard middleware for page routes.
///
/// Runs the navigation guard on page navigations only; bundle and asset
/// fetches pass through. On proceed, the session identity (if any) is
/// injected into request extensions.
pub async fn access_guard_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !is_navigation(request.method(), request.headers()) {
        return next.run(request).await;
    }

    let identity = state.identity.current_user(request.headers());
    let from = referer_path(request.headers());
    let to = request.uri().path().to_string();

    match state.policy.check(&to, from.as_deref(), identity.as_ref()) {
        GuardDecision::Redirect(location) => {
            tracing::debug!("Redirecting anonymous navigation {} -> {}", to, location);
            Redirect::to(&location).into_response()
        }
        GuardDecision::Proceed => {
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }
            next.run(request).await
        }
    }
}

/// A browser page navigation, as opposed to a script, style or API fetch
fn is_navigation(method: &Method, headers: &HeaderMap) -> bool {
    if method != Method::GET && method != Method::HEAD {
        return false;
    }

    if let Some(mode) = headers.get("sec-fetch-mode").and_then(|v| v.to_str().ok()) {
        return mode == "navigate";
    }

    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Path of the page the navigation came from, if the browser told us
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    url::Url::parse(referer).ok().map(|u| u.path().to_string())
}
