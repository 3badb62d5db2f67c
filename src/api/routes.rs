//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, edit_link_handler, enable_link_handler,
    get_link_handler, link_clicks_handler, list_links_handler, most_requested_handler,
    tags_handler, verify_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Management API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /links/verify`                - Classify a candidate origin URL
/// - `POST   /links`                       - Register a link
/// - `GET    /links`                       - List links (paginated, searchable)
/// - `GET    /links/{id}`                  - Fetch a link
/// - `PATCH  /links/{id}`                  - Partially update a link
/// - `DELETE /links/{id}`                  - Delete a link and its clicks
/// - `PUT    /links/{id}/enable`           - Enable or disable forwarding
/// - `GET    /tags`                        - Tags with link counts
/// - `GET    /report/most-requested`       - Top links by clicks
/// - `GET    /report/links/{id}/clicks`    - Click count for one link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links/verify", post(verify_link_handler))
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(edit_link_handler)
                .delete(delete_link_handler),
        )
        .route("/links/{id}/enable", put(enable_link_handler))
        .route("/tags", get(tags_handler))
        .route("/report/most-requested", get(most_requested_handler))
        .route("/report/links/{id}/clicks", get(link_clicks_handler))
}
