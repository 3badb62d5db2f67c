//! In-process implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Click, LinkClickCount, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Click storage keyed by link id.
pub struct MemoryClickRepository {
    clicks: DashMap<i64, Vec<Click>>,
    next_id: AtomicI64,
}

impl MemoryClickRepository {
    pub fn new() -> Self {
        Self {
            clicks: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryClickRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClickRepository for MemoryClickRepository {
    async fn insert(&self, new_click: NewClick) -> Result<Click, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let click = Click::from_new(id, new_click);

        self.clicks
            .entry(click.link_id)
            .or_default()
            .push(click.clone());

        Ok(click)
    }

    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError> {
        Ok(self
            .clicks
            .get(&link_id)
            .map(|clicks| clicks.len() as i64)
            .unwrap_or(0))
    }

    async fn most_requested(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<LinkClickCount>, AppError> {
        let mut counts: Vec<LinkClickCount> = self
            .clicks
            .iter()
            .map(|entry| LinkClickCount {
                link_id: *entry.key(),
                clicks: entry.value().iter().filter(|c| c.clicked_at >= since).count() as i64,
            })
            .filter(|count| count.clicks > 0)
            .collect();

        counts.sort_by(|a, b| b.clicks.cmp(&a.clicks).then(a.link_id.cmp(&b.link_id)));
        counts.truncate(limit);

        Ok(counts)
    }

    async fn delete_for_link(&self, link_id: i64) -> Result<u64, AppError> {
        Ok(self
            .clicks
            .remove(&link_id)
            .map(|(_, clicks)| clicks.len() as u64)
            .unwrap_or(0))
    }
}
