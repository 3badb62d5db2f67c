//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{LinkService, LinkSettings, ReportService};
use crate::domain::click_event::ClickEvent;
use crate::domain::verification::LinkVerifier;
use crate::infrastructure::persistence::{MemoryClickRepository, MemoryLinkRepository};

pub type AppLinkService = LinkService<MemoryLinkRepository, MemoryClickRepository>;
pub type AppReportService = ReportService<MemoryLinkRepository, MemoryClickRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub report_service: Arc<AppReportService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Trust `X-Forwarded-Host` / `X-Forwarded-Proto` when resolving the request origin.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_repository: Arc<MemoryLinkRepository>,
        click_repository: Arc<MemoryClickRepository>,
        settings: LinkSettings,
        click_sender: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            link_repository.clone(),
            click_repository.clone(),
            Arc::new(LinkVerifier::default()),
            settings,
        ));
        let report_service = Arc::new(ReportService::new(link_repository, click_repository));

        Self {
            link_service,
            report_service,
            click_sender,
            behind_proxy,
        }
    }
}
