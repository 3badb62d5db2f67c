//! # Link Forwarder
//!
//! A link forwarding service built with Axum. Registered links map a short
//! token (`/fw/{token}`) or a readable aka name (`/aka/{name}`) to an origin
//! URL, and every origin URL is verified before it is stored or followed.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link verification, entities and repository traits
//! - **Application Layer** ([`application`]) - Business logic and service orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - Repository implementations
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Link Verification
//!
//! [`domain::verification::LinkVerifier`] classifies a candidate URL as
//! `valid`, `invalid_format`, `invalid_local` or `invalid_self_reference`.
//! The last outcome stops a link from forwarding to this service's own
//! forward endpoints, which would otherwise create redirect loops.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, LinkSettings, ReportService};
    pub use crate::domain::entities::{Click, Link, NewLink};
    pub use crate::domain::verification::{
        ForwardEndpoints, LinkVerifier, LinkVerifyResult, RequestOrigin,
    };
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
