//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory representation of a click for async processing.
///
/// Created by the forward handlers and sent through a bounded channel to
/// [`crate::domain::click_worker::run_click_worker`], so a redirect never waits
/// on a storage write.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(42, Some("192.168.1.1".to_string()), Some("Mozilla/5.0"));
    /// ```
    pub fn new(link_id: i64, ip: Option<String>, user_agent: Option<&str>) -> Self {
        Self {
            link_id,
            clicked_at: Utc::now(),
            user_agent: user_agent.map(|s| s.to_string()),
            ip,
        }
    }

    /// Converts the event into a storage record.
    pub fn into_new_click(self) -> NewClick {
        NewClick {
            link_id: self.link_id,
            clicked_at: self.clicked_at,
            user_agent: self.user_agent,
            ip: self.ip,
        }
    }
}
