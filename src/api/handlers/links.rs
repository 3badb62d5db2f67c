//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, EditLinkRequest, EnableLinkRequest, LinkListResponse, LinkResponse,
    VerifyLinkRequest, VerifyLinkResponse,
};
use crate::api::dto::pagination::{LinkListParams, PaginationMeta};
use crate::domain::entities::Link;
use crate::domain::verification::RequestOrigin;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::extract_request_origin;

fn link_response(state: &AppState, origin: &RequestOrigin, link: Link) -> LinkResponse {
    let forward_url = state.link_service.forward_url(origin, &link.token);
    let aka_url = link
        .aka_name
        .as_deref()
        .map(|name| state.link_service.aka_url(origin, name));

    LinkResponse::new(link, forward_url, aka_url)
}

/// Classifies a candidate origin URL without storing anything.
///
/// # Endpoint
///
/// `POST /api/links/verify`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Response
///
/// ```json
/// { "result": "valid", "valid": true, "message": "..." }
/// ```
///
/// The result is evaluated against the origin of this request, so a URL
/// pointing at `/fw/...` on the same host reports `invalid_self_reference`.
pub async fn verify_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Json(payload): Json<VerifyLinkRequest>,
) -> Result<Json<VerifyLinkResponse>, AppError> {
    let origin = extract_request_origin(&headers, &uri, state.behind_proxy)?;
    let result = state
        .link_service
        .verify_url(payload.url.as_deref(), &origin);

    Ok(Json(result.into()))
}

/// Registers a new forwarding link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "origin_url": "https://example.com/page",
///   "aka_name": "promo",          // optional
///   "note": "Spring campaign",    // optional
///   "ttl_seconds": 600,           // optional
///   "tags": ["marketing"]         // optional
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: New link stored
/// - **200 OK**: Origin URL was already registered; existing link returned
/// - **400 Bad Request**: Validation or link verification failed
/// - **409 Conflict**: Aka name is taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let origin = extract_request_origin(&headers, &uri, state.behind_proxy)?;
    let created = state
        .link_service
        .create_link(payload.into(), &origin)
        .await?;

    let status = if created.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(link_response(&state, &origin, created.link))))
}

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=25&term=rust`
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid page or page size.
pub async fn list_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(params): Query<LinkListParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let origin = extract_request_origin(&headers, &uri, state.behind_proxy)?;
    let (links, total) = state
        .link_service
        .list_links(offset, limit, params.term())
        .await?;

    let items = links
        .into_iter()
        .map(|link| link_response(&state, &origin, link))
        .collect();

    Ok(Json(LinkListResponse {
        pagination: PaginationMeta::new(
            params.pagination.page(),
            params.pagination.page_size(),
            total,
        ),
        items,
    }))
}

/// Returns a single link.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<LinkResponse>, AppError> {
    let origin = extract_request_origin(&headers, &uri, state.behind_proxy)?;
    let link = state.link_service.get_link(id).await?;

    Ok(Json(link_response(&state, &origin, link)))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Request Body
///
/// All fields are optional. `null` clears `aka_name`, `note` or `ttl_seconds`.
///
/// ```json
/// {
///   "origin_url": "https://example.com/new",
///   "aka_name": null,
///   "tags": ["docs"]
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 400 Bad Request if validation or link verification fails.
/// Returns 409 Conflict if the new aka name is taken.
pub async fn edit_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Json(payload): Json<EditLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let origin = extract_request_origin(&headers, &uri, state.behind_proxy)?;
    let link = state
        .link_service
        .edit_link(id, payload.into(), &origin)
        .await?;

    Ok(Json(link_response(&state, &origin, link)))
}

/// Enables or disables forwarding for a link.
///
/// # Endpoint
///
/// `PUT /api/links/{id}/enable`
///
/// ```json
/// { "is_enabled": false }
/// ```
///
/// Returns 204 No Content, or 404 Not Found if the link doesn't exist.
pub async fn enable_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<EnableLinkRequest>,
) -> Result<StatusCode, AppError> {
    state
        .link_service
        .set_enabled(id, payload.is_enabled)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a link together with its click history.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// Returns 204 No Content, or 404 Not Found if the link doesn't exist.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
