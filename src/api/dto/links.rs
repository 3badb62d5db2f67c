//! DTOs for link management and verification endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::pagination::PaginationMeta;
use crate::application::services::CreateLinkCommand;
use crate::domain::entities::{Link, LinkPatch};
use crate::domain::verification::LinkVerifyResult;

/// Request body for `POST /api/links/verify`.
///
/// `url` may be absent or null; both classify as `invalid_format`.
#[derive(Debug, Deserialize)]
pub struct VerifyLinkRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Verification outcome preview.
#[derive(Debug, Serialize)]
pub struct VerifyLinkResponse {
    pub result: LinkVerifyResult,
    pub valid: bool,
    pub message: &'static str,
}

impl From<LinkVerifyResult> for VerifyLinkResponse {
    fn from(result: LinkVerifyResult) -> Self {
        Self {
            result,
            valid: result.is_valid(),
            message: result.message(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048))]
    pub origin_url: String,

    #[validate(length(min = 1, max = 32))]
    pub aka_name: Option<String>,

    #[validate(length(max = 500))]
    pub note: Option<String>,

    #[serde(default = "default_enabled")]
    pub is_enabled: bool,

    /// Redirect cache lifetime; the configured default applies when absent.
    #[validate(range(min = 1))]
    pub ttl_seconds: Option<u32>,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
}

impl From<CreateLinkRequest> for CreateLinkCommand {
    fn from(request: CreateLinkRequest) -> Self {
        Self {
            origin_url: request.origin_url,
            aka_name: request.aka_name,
            note: request.note,
            is_enabled: request.is_enabled,
            ttl_seconds: request.ttl_seconds,
            tags: request.tags,
        }
    }
}

/// Request body for `PATCH /api/links/{id}`.
///
/// Only provided fields are changed. For `aka_name`, `note` and `ttl_seconds`:
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear the value
/// - **Value** → set it
#[derive(Debug, Deserialize, Validate)]
pub struct EditLinkRequest {
    #[validate(length(min = 1, max = 2048))]
    pub origin_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(min = 1, max = 32))]
    pub aka_name: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 500))]
    pub note: Option<Option<String>>,

    pub is_enabled: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(range(min = 1))]
    pub ttl_seconds: Option<Option<u32>>,

    #[validate(length(max = 20))]
    pub tags: Option<Vec<String>>,
}

impl From<EditLinkRequest> for LinkPatch {
    fn from(request: EditLinkRequest) -> Self {
        Self {
            origin_url: request.origin_url,
            aka_name: request.aka_name,
            note: request.note,
            is_enabled: request.is_enabled,
            ttl_seconds: request.ttl_seconds,
            tags: request.tags,
        }
    }
}

/// Request body for `PUT /api/links/{id}/enable`.
#[derive(Debug, Deserialize)]
pub struct EnableLinkRequest {
    pub is_enabled: bool,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub origin_url: String,
    pub token: String,
    pub forward_url: String,
    pub aka_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aka_url: Option<String>,
    pub note: Option<String>,
    pub is_enabled: bool,
    pub ttl_seconds: Option<u32>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LinkResponse {
    pub fn new(link: Link, forward_url: String, aka_url: Option<String>) -> Self {
        Self {
            id: link.id,
            origin_url: link.origin_url,
            token: link.token,
            forward_url,
            aka_name: link.aka_name,
            aka_url,
            note: link.note,
            is_enabled: link.is_enabled,
            ttl_seconds: link.ttl_seconds,
            tags: link.tags,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Paged link listing.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<LinkResponse>,
}

/// A tag with the number of links carrying it.
#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub tag: String,
    pub links: i64,
}
