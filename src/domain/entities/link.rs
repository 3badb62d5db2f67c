//! Link entity representing a forwarding rule.

use chrono::{DateTime, Utc};

/// A forwarding rule from a token (and optional aka name) to an origin URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub origin_url: String,
    pub token: String,
    pub aka_name: Option<String>,
    pub note: Option<String>,
    pub is_enabled: bool,
    /// Client cache lifetime hint for the redirect, in seconds.
    pub ttl_seconds: Option<u32>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a link from a [`NewLink`] and the identity assigned by storage.
    pub fn from_new(id: i64, new_link: NewLink, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            origin_url: new_link.origin_url,
            token: new_link.token,
            aka_name: new_link.aka_name,
            note: new_link.note,
            is_enabled: new_link.is_enabled,
            ttl_seconds: new_link.ttl_seconds,
            tags: new_link.tags,
            created_at,
            updated_at: None,
        }
    }

    /// Returns true if the link carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Applies a patch in place and stamps `updated_at`.
    pub fn apply(&mut self, patch: LinkPatch, now: DateTime<Utc>) {
        if let Some(origin_url) = patch.origin_url {
            self.origin_url = origin_url;
        }
        if let Some(aka_name) = patch.aka_name {
            self.aka_name = aka_name;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        if let Some(is_enabled) = patch.is_enabled {
            self.is_enabled = is_enabled;
        }
        if let Some(ttl_seconds) = patch.ttl_seconds {
            self.ttl_seconds = ttl_seconds;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = Some(now);
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub origin_url: String,
    pub token: String,
    pub aka_name: Option<String>,
    pub note: Option<String>,
    pub is_enabled: bool,
    pub ttl_seconds: Option<u32>,
    pub tags: Vec<String>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged. For the nullable fields,
/// `Some(None)` clears the value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub origin_url: Option<String>,
    pub aka_name: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub is_enabled: Option<bool>,
    pub ttl_seconds: Option<Option<u32>>,
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_link() -> NewLink {
        NewLink {
            origin_url: "https://example.com".to_string(),
            token: "abc12345".to_string(),
            aka_name: Some("promo".to_string()),
            note: None,
            is_enabled: true,
            ttl_seconds: Some(3600),
            tags: vec!["rust".to_string()],
        }
    }

    #[test]
    fn test_link_from_new() {
        let now = Utc::now();
        let link = Link::from_new(7, new_link(), now);

        assert_eq!(link.id, 7);
        assert_eq!(link.token, "abc12345");
        assert_eq!(link.origin_url, "https://example.com");
        assert_eq!(link.aka_name.as_deref(), Some("promo"));
        assert_eq!(link.created_at, now);
        assert!(link.updated_at.is_none());
        assert!(link.has_tag("rust"));
        assert!(!link.has_tag("go"));
    }

    #[test]
    fn test_apply_patch_changes_only_given_fields() {
        let mut link = Link::from_new(1, new_link(), Utc::now());
        let now = Utc::now();

        link.apply(
            LinkPatch {
                origin_url: Some("https://rust-lang.org".to_string()),
                is_enabled: Some(false),
                ..Default::default()
            },
            now,
        );

        assert_eq!(link.origin_url, "https://rust-lang.org");
        assert!(!link.is_enabled);
        assert_eq!(link.aka_name.as_deref(), Some("promo"));
        assert_eq!(link.ttl_seconds, Some(3600));
        assert_eq!(link.updated_at, Some(now));
    }

    #[test]
    fn test_apply_patch_clears_nullable_fields() {
        let mut link = Link::from_new(1, new_link(), Utc::now());

        link.apply(
            LinkPatch {
                aka_name: Some(None),
                ttl_seconds: Some(None),
                note: Some(Some("moved".to_string())),
                tags: Some(vec![]),
                ..Default::default()
            },
            Utc::now(),
        );

        assert!(link.aka_name.is_none());
        assert!(link.ttl_seconds.is_none());
        assert_eq!(link.note.as_deref(), Some("moved"));
        assert!(link.tags.is_empty());
    }
}
