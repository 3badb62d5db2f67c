//! Handler for the tag listing endpoint.

use axum::{Json, extract::State};

use crate::api::dto::links::TagResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every tag in use with its link count, sorted by tag.
///
/// # Endpoint
///
/// `GET /api/tags`
pub async fn tags_handler(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = state.link_service.list_tags().await?;

    Ok(Json(
        tags.into_iter()
            .map(|(tag, links)| TagResponse { tag, links })
            .collect(),
    ))
}
