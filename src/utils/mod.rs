//! Utility functions for token generation, URL classification, and request handling.
//!
//! This module provides helper functions used across the application:
//!
//! - [`token`] - Forward token generation and tag normalization
//! - [`local_url`] - Detection of app-local URL paths
//! - [`request_origin`] - Scheme and authority extraction from HTTP requests

pub mod local_url;
pub mod request_origin;
pub mod token;
