//! In-process implementation of the link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::Mutex;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link storage backed by a concurrent map.
///
/// Reads are lock-free. Writes are serialized so uniqueness of token, aka name
/// and origin URL is checked and applied atomically.
pub struct MemoryLinkRepository {
    links: DashMap<i64, Link>,
    next_id: AtomicI64,
    write_lock: Mutex<()>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns a conflict error if another link already uses one of the given keys.
    fn check_unique(
        &self,
        exclude_id: Option<i64>,
        token: Option<&str>,
        aka_name: Option<&str>,
        origin_url: Option<&str>,
    ) -> Result<(), AppError> {
        for entry in self.links.iter() {
            let link = entry.value();
            if Some(link.id) == exclude_id {
                continue;
            }

            if token.is_some_and(|t| link.token == t) {
                return Err(AppError::conflict(
                    "Token already exists",
                    json!({ "token": link.token }),
                ));
            }

            if let (Some(aka), Some(existing)) = (aka_name, link.aka_name.as_deref())
                && existing.eq_ignore_ascii_case(aka)
            {
                return Err(AppError::conflict(
                    "Aka name already exists",
                    json!({ "aka_name": aka }),
                ));
            }

            if origin_url.is_some_and(|u| link.origin_url == u) {
                return Err(AppError::conflict(
                    "Origin URL is already registered",
                    json!({ "origin_url": link.origin_url, "token": link.token }),
                ));
            }
        }

        Ok(())
    }

    fn find_by<F>(&self, predicate: F) -> Option<Link>
    where
        F: Fn(&Link) -> bool,
    {
        self.links
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    fn matching(&self, term: Option<&str>) -> Vec<Link> {
        let term = term
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        self.links
            .iter()
            .filter(|entry| match &term {
                Some(term) => matches_term(entry.value(), term),
                None => true,
            })
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_term(link: &Link, term: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(term);

    contains(&link.origin_url)
        || contains(&link.token)
        || link.aka_name.as_deref().is_some_and(contains)
        || link.note.as_deref().is_some_and(contains)
        || link.tags.iter().any(|tag| contains(tag))
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let _guard = self.write_lock.lock().await;

        self.check_unique(
            None,
            Some(&new_link.token),
            new_link.aka_name.as_deref(),
            Some(&new_link.origin_url),
        )?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let link = Link::from_new(id, new_link, Utc::now());
        self.links.insert(id, link.clone());

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError> {
        Ok(self.find_by(|link| link.token == token))
    }

    async fn find_by_aka_name(&self, aka_name: &str) -> Result<Option<Link>, AppError> {
        Ok(self.find_by(|link| {
            link.aka_name
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(aka_name))
        }))
    }

    async fn find_by_origin_url(&self, origin_url: &str) -> Result<Option<Link>, AppError> {
        Ok(self.find_by(|link| link.origin_url == origin_url))
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let _guard = self.write_lock.lock().await;

        if !self.links.contains_key(&id) {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        let aka_name = patch.aka_name.as_ref().and_then(|a| a.as_deref());
        self.check_unique(Some(id), None, aka_name, patch.origin_url.as_deref())?;

        let mut entry = self
            .links
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;
        entry.apply(patch, Utc::now());

        Ok(entry.clone())
    }

    async fn set_enabled(&self, id: i64, is_enabled: bool) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;

        match self.links.get_mut(&id) {
            Some(mut entry) => {
                entry.is_enabled = is_enabled;
                entry.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        Ok(self.links.remove(&id).is_some())
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
        term: Option<String>,
    ) -> Result<Vec<Link>, AppError> {
        let mut links = self.matching(term.as_deref());
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(links
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, term: Option<String>) -> Result<i64, AppError> {
        Ok(self.matching(term.as_deref()).len() as i64)
    }

    async fn tags(&self) -> Result<Vec<(String, i64)>, AppError> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();

        for entry in self.links.iter() {
            for tag in &entry.value().tags {
                *counts.entry(tag.clone()).or_default() += 1;
            }
        }

        Ok(counts.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link(token: &str, url: &str) -> NewLink {
        NewLink {
            origin_url: url.to_string(),
            token: token.to_string(),
            aka_name: None,
            note: None,
            is_enabled: true,
            ttl_seconds: None,
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryLinkRepository::new();
        let link = repo
            .create(new_link("tok00001", "https://example.com/a"))
            .await
            .unwrap();

        assert_eq!(link.id, 1);
        assert_eq!(
            repo.find_by_id(1).await.unwrap().map(|l| l.token),
            Some("tok00001".to_string())
        );
        assert!(repo.find_by_token("tok00001").await.unwrap().is_some());
        assert!(repo.find_by_token("TOK00001").await.unwrap().is_none());
        assert!(
            repo.find_by_origin_url("https://example.com/a")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = MemoryLinkRepository::new();
        let a = repo.create(new_link("a", "https://a.com")).await.unwrap();
        let b = repo.create(new_link("b", "https://b.com")).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn test_duplicate_token_conflict() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("same", "https://a.com")).await.unwrap();

        let result = repo.create(new_link("same", "https://b.com")).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_origin_url_conflict() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("a", "https://a.com")).await.unwrap();

        let result = repo.create(new_link("b", "https://a.com")).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_aka_name_is_case_insensitive() {
        let repo = MemoryLinkRepository::new();
        let mut first = new_link("a", "https://a.com");
        first.aka_name = Some("Promo".to_string());
        repo.create(first).await.unwrap();

        assert!(repo.find_by_aka_name("promo").await.unwrap().is_some());

        let mut second = new_link("b", "https://b.com");
        second.aka_name = Some("PROMO".to_string());
        let result = repo.create(second).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("a", "https://a.com")).await.unwrap();

        let updated = repo
            .update(
                link.id,
                LinkPatch {
                    origin_url: Some("https://new.com".to_string()),
                    note: Some(Some("moved".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.origin_url, "https://new.com");
        assert_eq!(updated.note.as_deref(), Some("moved"));
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_same_origin_url_is_not_conflict() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("a", "https://a.com")).await.unwrap();

        let result = repo
            .update(
                link.id,
                LinkPatch {
                    origin_url: Some("https://a.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MemoryLinkRepository::new();
        let result = repo.update(99, LinkPatch::default()).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_set_enabled_and_delete() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("a", "https://a.com")).await.unwrap();

        assert!(repo.set_enabled(link.id, false).await.unwrap());
        assert!(!repo.find_by_id(link.id).await.unwrap().unwrap().is_enabled);
        assert!(!repo.set_enabled(99, false).await.unwrap());

        assert!(repo.delete(link.id).await.unwrap());
        assert!(!repo.delete(link.id).await.unwrap());
        assert!(repo.find_by_id(link.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pagination_and_term() {
        let repo = MemoryLinkRepository::new();
        for i in 0..5 {
            let mut link = new_link(&format!("tok{i}"), &format!("https://site{i}.com"));
            if i % 2 == 0 {
                link.tags = vec!["even".to_string()];
            }
            repo.create(link).await.unwrap();
        }

        let page = repo.list(0, 2, None).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].token, "tok4");
        assert_eq!(page[1].token, "tok3");

        let rest = repo.list(4, 10, None).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].token, "tok0");

        assert_eq!(repo.count(None).await.unwrap(), 5);
        assert_eq!(repo.count(Some("EVEN".to_string())).await.unwrap(), 3);
        assert_eq!(repo.count(Some("site1".to_string())).await.unwrap(), 1);
        assert_eq!(repo.count(Some("   ".to_string())).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_tags_counts() {
        let repo = MemoryLinkRepository::new();
        let mut a = new_link("a", "https://a.com");
        a.tags = vec!["rust".to_string(), "web".to_string()];
        let mut b = new_link("b", "https://b.com");
        b.tags = vec!["rust".to_string()];
        repo.create(a).await.unwrap();
        repo.create(b).await.unwrap();

        let tags = repo.tags().await.unwrap();
        assert_eq!(
            tags,
            vec![("rust".to_string(), 2), ("web".to_string(), 1)]
        );
    }
}
