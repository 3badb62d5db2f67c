//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, link verification and business
//! rules, and expose a clean API to the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link registration, editing and resolution
//! - [`services::report_service::ReportService`] - Click reports

pub mod services;
