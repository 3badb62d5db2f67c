//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Creation and update inputs are separate
//! types:
//!
//! - [`Link`] / [`NewLink`] / [`LinkPatch`] - A forwarding rule
//! - [`Click`] / [`NewClick`] - A followed forward
//! - [`LinkClickCount`] - Per-link click totals for reports

pub mod click;
pub mod link;

pub use click::{Click, LinkClickCount, NewClick};
pub use link::{Link, LinkPatch, NewLink};
