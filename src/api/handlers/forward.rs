//! Handlers for the public forward endpoints.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, Uri, header},
    response::{IntoResponse, Redirect, Response},
};
use std::net::SocketAddr;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::extract_request_origin;

/// Forwards a token to its origin URL.
///
/// # Endpoint
///
/// `GET /fw/{token}`
///
/// # Request Flow
///
/// 1. Resolve the enabled link for the token
/// 2. Re-verify the stored origin URL against this request's origin
/// 3. Send a click event to the background worker
/// 4. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found if the token is unknown or the link is disabled.
/// Returns 400 Bad Request if the stored origin URL no longer verifies,
/// e.g. it now points back at this host's forward endpoints.
pub async fn forward_token_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let link = state
        .link_service
        .resolve_token(&token)
        .await
        .inspect_err(|_| record_forward("not_found"))?;

    forward(&state, link, &headers, &uri, addr)
}

/// Forwards an aka name to its origin URL.
///
/// # Endpoint
///
/// `GET /aka/{name}`
///
/// Same flow and errors as [`forward_token_handler`].
pub async fn forward_aka_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let link = state
        .link_service
        .resolve_aka(&name)
        .await
        .inspect_err(|_| record_forward("not_found"))?;

    forward(&state, link, &headers, &uri, addr)
}

fn forward(
    state: &AppState,
    link: Link,
    headers: &HeaderMap,
    uri: &Uri,
    addr: SocketAddr,
) -> Result<Response, AppError> {
    let origin = extract_request_origin(headers, uri, state.behind_proxy)?;

    let result = state
        .link_service
        .verify_url(Some(&link.origin_url), &origin);
    if !result.is_valid() {
        warn!(id = link.id, outcome = %result, "Refusing to forward to stored origin URL");
        record_forward("rejected");
        return Err(AppError::link_verification(result));
    }

    let click_event = ClickEvent::new(
        link.id,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    );

    // Queue full or worker gone: the click is dropped, the redirect is not.
    if let Err(e) = state.click_sender.try_send(click_event) {
        debug!(id = link.id, error = %e, "Click event dropped");
        metrics::counter!("click_events_dropped_total").increment(1);
    }

    record_forward("redirected");

    let mut response = Redirect::temporary(&link.origin_url).into_response();
    if let Some(ttl) = link.ttl_seconds
        && let Ok(value) = HeaderValue::from_str(&format!("private, max-age={ttl}"))
    {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }

    Ok(response)
}

fn record_forward(result: &'static str) {
    metrics::counter!("forward_requests_total", "result" => result).increment(1);
}
