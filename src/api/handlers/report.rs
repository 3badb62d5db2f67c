//! Handlers for click report endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::report::{LinkClicksItem, MostRequestedParams, MostRequestedResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the most clicked links over a trailing window.
///
/// # Endpoint
///
/// `GET /api/report/most-requested?days=7&limit=10`
///
/// # Query Parameters
///
/// - `days`: window length, 1..=365 (default 7)
/// - `limit`: maximum rows, 1..=100 (default 10)
///
/// # Errors
///
/// Returns 400 Bad Request if a parameter is out of range.
pub async fn most_requested_handler(
    State(state): State<AppState>,
    Query(params): Query<MostRequestedParams>,
) -> Result<Json<MostRequestedResponse>, AppError> {
    let (days, limit) = (params.days(), params.limit());
    let report = state.report_service.most_requested(days, limit).await?;

    Ok(Json(MostRequestedResponse {
        days,
        limit,
        items: report.into_iter().map(LinkClicksItem::from).collect(),
    }))
}

/// Returns the total click count for one link.
///
/// # Endpoint
///
/// `GET /api/report/links/{id}/clicks`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
pub async fn link_clicks_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<LinkClicksItem>, AppError> {
    let entry = state.report_service.link_clicks(id).await?;

    Ok(Json(entry.into()))
}
