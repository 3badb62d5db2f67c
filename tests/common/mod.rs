#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use link_forwarder::application::services::{CreateLinkCommand, LinkSettings};
use link_forwarder::domain::click_event::ClickEvent;
use link_forwarder::domain::entities::{Link, NewClick};
use link_forwarder::domain::repositories::ClickRepository;
use link_forwarder::domain::verification::RequestOrigin;
use link_forwarder::infrastructure::persistence::{MemoryClickRepository, MemoryLinkRepository};
use link_forwarder::routes::router;
use link_forwarder::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const HOST: &str = "s.example.com";

pub struct TestContext {
    pub state: AppState,
    pub click_rx: mpsc::Receiver<ClickEvent>,
    pub clicks: Arc<MemoryClickRepository>,
}

/// Builds state over fresh in-memory repositories.
///
/// The state trusts forwarded headers; use [`from_origin`] to set them.
pub fn create_test_state(settings: LinkSettings) -> TestContext {
    create_test_state_with_capacity(settings, 100)
}

pub fn create_test_state_with_capacity(settings: LinkSettings, capacity: usize) -> TestContext {
    let (click_tx, click_rx) = mpsc::channel(capacity);
    let links = Arc::new(MemoryLinkRepository::new());
    let clicks = Arc::new(MemoryClickRepository::new());

    let state = AppState::new(links, clicks.clone(), settings, click_tx, true);

    TestContext {
        state,
        click_rx,
        clicks,
    }
}

pub fn test_server(state: AppState) -> TestServer {
    let app: Router = router(state).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

/// Marks a request as arriving on `https://s.example.com`.
pub fn from_origin(request: TestRequest) -> TestRequest {
    request
        .add_header("X-Forwarded-Host", HOST)
        .add_header("X-Forwarded-Proto", "https")
}

pub fn origin() -> RequestOrigin {
    RequestOrigin::new(HOST, "https")
}

pub async fn create_test_link(state: &AppState, url: &str, aka_name: Option<&str>) -> Link {
    let command = CreateLinkCommand {
        origin_url: url.to_string(),
        aka_name: aka_name.map(str::to_string),
        is_enabled: true,
        ..Default::default()
    };

    state
        .link_service
        .create_link(command, &origin())
        .await
        .unwrap()
        .link
}

pub async fn create_test_clicks(clicks: &MemoryClickRepository, link_id: i64, count: usize) {
    for _ in 0..count {
        clicks
            .insert(NewClick {
                link_id,
                clicked_at: Utc::now(),
                user_agent: None,
                ip: Some("127.0.0.1".to_string()),
            })
            .await
            .unwrap();
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
