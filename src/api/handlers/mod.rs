//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod forward;
pub mod health;
pub mod links;
pub mod report;
pub mod tags;

pub use forward::{forward_aka_handler, forward_token_handler};
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, edit_link_handler, enable_link_handler,
    get_link_handler, list_links_handler, verify_link_handler,
};
pub use report::{link_clicks_handler, most_requested_handler};
pub use tags::tags_handler;
