//! Business logic services for the application layer.

pub mod link_service;
pub mod report_service;

pub use link_service::{CreateLinkCommand, CreatedLink, LinkService, LinkSettings};
pub use report_service::{ReportService, RequestedLink};
