//! Background worker persisting click events.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;

/// Insert attempts per event, the first one included.
const MAX_ATTEMPTS: usize = 3;

/// Drains the click channel until every sender is dropped.
///
/// Each event is inserted through the repository, retried with exponential
/// backoff on failure. Events that still fail are logged and counted, never
/// propagated: click tracking must not affect forwarding.
pub async fn run_click_worker<C>(mut rx: mpsc::Receiver<ClickEvent>, repository: Arc<C>)
where
    C: ClickRepository + ?Sized + 'static,
{
    while let Some(event) = rx.recv().await {
        let link_id = event.link_id;
        let new_click = event.into_new_click();

        let strategy = ExponentialBackoff::from_millis(10)
            .map(jitter)
            .take(MAX_ATTEMPTS - 1);

        let result = Retry::spawn(strategy, || {
            let repository = repository.clone();
            let new_click = new_click.clone();
            async move { repository.insert(new_click).await }
        })
        .await;

        match result {
            Ok(click) => debug!(link_id, click_id = click.id, "Click recorded"),
            Err(e) => {
                warn!(link_id, error = %e, "Failed to record click");
                metrics::counter!("click_events_failed_total").increment(1);
            }
        }
    }

    info!("Click worker stopped");
}
