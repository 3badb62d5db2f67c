//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`verification`] - Rules deciding whether a URL may become a redirect target
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! The domain layer has no dependency on the HTTP layer: the verifier takes
//! a local-URL capability and a [`verification::RequestOrigin`] instead of
//! framework request types.
//!
//! # Click Processing Flow
//!
//! 1. A forward handler resolves a link and redirects
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] persists it with retry
//! 4. Reports read the clicks through [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
pub mod verification;
