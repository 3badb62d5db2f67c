//! Click reporting service.

use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use chrono::{Duration, Utc};
use serde_json::json;

pub const DEFAULT_REPORT_DAYS: u32 = 7;
pub const MAX_REPORT_DAYS: u32 = 365;
pub const DEFAULT_REPORT_LIMIT: u32 = 10;
pub const MAX_REPORT_LIMIT: u32 = 100;

/// A link together with its click count for a report window.
#[derive(Debug, Clone)]
pub struct RequestedLink {
    pub link: Link,
    pub clicks: i64,
}

/// Service for aggregated click reports.
///
/// Click counts come from the [`ClickRepository`]; link metadata is joined
/// from the [`LinkRepository`].
pub struct ReportService<L: LinkRepository, C: ClickRepository> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L: LinkRepository, C: ClickRepository> ReportService<L, C> {
    /// Creates a new report service.
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Returns the most clicked links over the last `days` days.
    ///
    /// Links deleted after their clicks were recorded are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `days` is outside `1..=365`
    /// or `limit` is outside `1..=100`.
    pub async fn most_requested(
        &self,
        days: u32,
        limit: u32,
    ) -> Result<Vec<RequestedLink>, AppError> {
        if !(1..=MAX_REPORT_DAYS).contains(&days) {
            return Err(AppError::bad_request(
                "Report window out of range",
                json!({ "days": days, "min": 1, "max": MAX_REPORT_DAYS }),
            ));
        }
        if !(1..=MAX_REPORT_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(
                "Report limit out of range",
                json!({ "limit": limit, "min": 1, "max": MAX_REPORT_LIMIT }),
            ));
        }

        let since = Utc::now() - Duration::days(i64::from(days));
        let limit = limit as usize;
        let mut fetch = limit;

        // Counts for deleted links are skipped, so widen the window until
        // `limit` live links are found or the counts run out.
        loop {
            let counts = self.click_repository.most_requested(since, fetch).await?;
            let exhausted = counts.len() < fetch;

            let mut report = Vec::with_capacity(limit);
            for count in counts {
                if report.len() == limit {
                    break;
                }
                if let Some(link) = self.link_repository.find_by_id(count.link_id).await? {
                    report.push(RequestedLink {
                        link,
                        clicks: count.clicks,
                    });
                }
            }

            if report.len() == limit || exhausted {
                return Ok(report);
            }
            fetch = fetch.saturating_mul(2);
        }
    }

    /// Returns the total click count for a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn link_clicks(&self, link_id: i64) -> Result<RequestedLink, AppError> {
        let link = self
            .link_repository
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))?;

        let clicks = self.click_repository.count_for_link(link_id).await?;

        Ok(RequestedLink { link, clicks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LinkClickCount, NewLink};
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use mockall::Sequence;

    fn test_link(id: i64) -> Link {
        Link::from_new(
            id,
            NewLink {
                origin_url: format!("https://example.com/{id}"),
                token: format!("tok{id}"),
                aka_name: None,
                note: None,
                is_enabled: true,
                ttl_seconds: None,
                tags: vec![],
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_most_requested_joins_links() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_most_requested()
            .withf(|_, limit| *limit == 5)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    LinkClickCount {
                        link_id: 2,
                        clicks: 9,
                    },
                    LinkClickCount {
                        link_id: 3,
                        clicks: 4,
                    },
                ])
            });

        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .times(2)
            .returning(|id| Ok((id == 2).then(|| test_link(id))));

        let service = ReportService::new(Arc::new(links), Arc::new(clicks));
        let report = service.most_requested(7, 5).await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].link.id, 2);
        assert_eq!(report[0].clicks, 9);
    }

    #[tokio::test]
    async fn test_most_requested_skips_deleted_links_without_losing_slots() {
        let mut seq = Sequence::new();
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_most_requested()
            .withf(|_, limit| *limit == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(vec![LinkClickCount {
                    link_id: 999,
                    clicks: 3,
                }])
            });
        clicks
            .expect_most_requested()
            .withf(|_, limit| *limit == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(vec![
                    LinkClickCount {
                        link_id: 999,
                        clicks: 3,
                    },
                    LinkClickCount {
                        link_id: 2,
                        clicks: 1,
                    },
                ])
            });

        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(|id| Ok((id != 999).then(|| test_link(id))));

        let service = ReportService::new(Arc::new(links), Arc::new(clicks));
        let report = service.most_requested(7, 1).await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].link.id, 2);
        assert_eq!(report[0].clicks, 1);
    }

    #[tokio::test]
    async fn test_most_requested_stops_when_counts_run_out() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_most_requested()
            .withf(|_, limit| *limit == 2)
            .times(1)
            .returning(|_, _| {
                Ok(vec![LinkClickCount {
                    link_id: 999,
                    clicks: 3,
                }])
            });

        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = ReportService::new(Arc::new(links), Arc::new(clicks));
        let report = service.most_requested(7, 2).await.unwrap();

        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_most_requested_rejects_bad_window() {
        let mut clicks = MockClickRepository::new();
        clicks.expect_most_requested().times(0);

        let service = ReportService::new(Arc::new(MockLinkRepository::new()), Arc::new(clicks));

        for (days, limit) in [(0, 10), (366, 10), (7, 0), (7, 101)] {
            let err = service.most_requested(days, limit).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_link_clicks() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(test_link(id))));
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_count_for_link()
            .withf(|id| *id == 4)
            .times(1)
            .returning(|_| Ok(12));

        let service = ReportService::new(Arc::new(links), Arc::new(clicks));
        let result = service.link_clicks(4).await.unwrap();

        assert_eq!(result.link.id, 4);
        assert_eq!(result.clicks, 12);
    }

    #[tokio::test]
    async fn test_link_clicks_not_found() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().times(1).returning(|_| Ok(None));
        let mut clicks = MockClickRepository::new();
        clicks.expect_count_for_link().times(0);

        let service = ReportService::new(Arc::new(links), Arc::new(clicks));
        let err = service.link_clicks(4).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
