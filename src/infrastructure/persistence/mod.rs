//! In-process repository implementations.
//!
//! Concrete implementations of the domain repository traits backed by
//! `dashmap`. The durable store is owned by an external data layer; these
//! implementations back the server binary and the integration tests.
//!
//! # Repositories
//!
//! - [`MemoryLinkRepository`] - Link storage with uniqueness checks
//! - [`MemoryClickRepository`] - Click tracking and report queries

pub mod memory_click_repository;
pub mod memory_link_repository;

pub use memory_click_repository::MemoryClickRepository;
pub use memory_link_repository::MemoryLinkRepository;
