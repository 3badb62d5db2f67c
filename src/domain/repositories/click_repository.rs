//! Repository trait for click tracking and reports.

use crate::domain::entities::{Click, LinkClickCount, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for recorded clicks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryClickRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a click.
    async fn insert(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Total number of clicks recorded for a link.
    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError>;

    /// Links with the most clicks since `since`, highest first.
    ///
    /// Ties are broken by link id, ascending.
    async fn most_requested(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<LinkClickCount>, AppError>;

    /// Removes every click recorded for a link. Returns the number removed.
    async fn delete_for_link(&self, link_id: i64) -> Result<u64, AppError>;
}
