//! Repository trait for link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing forwarding links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token, aka name or origin URL is
    /// already registered.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its numeric id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Finds a link by its forward token. Matching is exact.
    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its aka name. Matching is case-insensitive.
    async fn find_by_aka_name(&self, aka_name: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its origin URL.
    ///
    /// Used to return the existing link instead of registering a duplicate.
    async fn find_by_origin_url(&self, origin_url: &str) -> Result<Option<Link>, AppError>;

    /// Partially updates a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Conflict`] if the new aka name or origin URL is taken.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError>;

    /// Enables or disables a link. Returns `Ok(false)` if no link has this id.
    async fn set_enabled(&self, id: i64, is_enabled: bool) -> Result<bool, AppError>;

    /// Deletes a link. Returns `Ok(false)` if no link has this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Lists links, newest first.
    ///
    /// `term` filters case-insensitively on origin URL, token, aka name, note and tags.
    async fn list(
        &self,
        offset: i64,
        limit: i64,
        term: Option<String>,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts links matching the same filter as [`LinkRepository::list`].
    async fn count(&self, term: Option<String>) -> Result<i64, AppError>;

    /// Returns every tag in use with the number of links carrying it, sorted by name.
    async fn tags(&self) -> Result<Vec<(String, i64)>, AppError>;
}
