//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern. The
//! persistent store is an external collaborator; the crate ships in-process
//! implementations in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Forwarding link CRUD operations
//! - [`ClickRepository`] - Click tracking and reports
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
