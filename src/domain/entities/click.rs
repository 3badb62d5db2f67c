//! Click entity representing a single forward event.

use chrono::{DateTime, Utc};

/// A click recorded when a forwarding link is followed.
///
/// Client metadata is optional: headers may be missing and the peer address
/// may be unavailable.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl Click {
    /// Creates a click from a [`NewClick`] and the identity assigned by storage.
    pub fn from_new(id: i64, new_click: NewClick) -> Self {
        Self {
            id,
            link_id: new_click.link_id,
            clicked_at: new_click.clicked_at,
            user_agent: new_click.user_agent,
            ip: new_click.ip,
        }
    }
}

/// Input data for recording a click.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// Click total for one link over a reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClickCount {
    pub link_id: i64,
    pub clicks: i64,
}
