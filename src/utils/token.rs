//! Forward token generation and link metadata normalization.
//!
//! Tokens are short random strings that identify a link under `/fw/{token}`.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of random bytes before base64 encoding.
const TOKEN_LENGTH_BYTES: usize = 6;

/// Maximum length of an aka name.
pub const AKA_NAME_MAX_LENGTH: usize = 32;

/// Aka names: letters, digits and hyphens, not starting with a hyphen.
static AKA_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*$").unwrap());

/// Generates a random forward token.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character token.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_token() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Validates a user-provided aka name.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens
/// - Cannot start with a hyphen
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_aka_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.len() > AKA_NAME_MAX_LENGTH {
        return Err(AppError::bad_request(
            "Aka name must be 1-32 characters",
            json!({ "provided_length": name.len() }),
        ));
    }

    if !AKA_NAME_REGEX.is_match(name) {
        return Err(AppError::bad_request(
            "Aka name can only contain letters, digits, and hyphens, and cannot start with a hyphen",
            json!({ "aka_name": name }),
        ));
    }

    Ok(())
}

/// Normalizes a list of tag names.
///
/// Each tag is trimmed, inner whitespace runs become a single `-`, and the
/// result is lower-cased. Empty tags are dropped and duplicates removed,
/// keeping first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();

    for tag in tags {
        let tag = tag
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();

        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }

    normalized
}
