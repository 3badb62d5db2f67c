mod common;

use common::{create_test_link, create_test_state, from_origin, test_server};
use link_forwarder::application::services::LinkSettings;
use serde_json::Value;

#[tokio::test]
async fn test_forward_token_success() {
    let ctx = create_test_state(LinkSettings::default());
    let link = create_test_link(&ctx.state, "https://example.com/target", None).await;
    let server = test_server(ctx.state);

    let response = from_origin(server.get(&format!("/fw/{}", link.token))).await;

    assert_eq!(response.status_code(), 307);
    let location = response.header("location");
    assert_eq!(location, "https://example.com/target");
}

#[tokio::test]
async fn test_forward_aka_success() {
    let ctx = create_test_state(LinkSettings::default());
    create_test_link(&ctx.state, "https://example.com/docs", Some("docs")).await;
    let server = test_server(ctx.state);

    let response = from_origin(server.get("/aka/docs")).await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/docs");
}

#[tokio::test]
async fn test_forward_sets_cache_control_from_ttl() {
    let settings = LinkSettings {
        allow_self_redirection: false,
        default_ttl_seconds: Some(600),
    };
    let ctx = create_test_state(settings);
    let link = create_test_link(&ctx.state, "https://example.com/cached", None).await;
    let server = test_server(ctx.state);

    let response = from_origin(server.get(&format!("/fw/{}", link.token))).await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("cache-control"), "private, max-age=600");
}

#[tokio::test]
async fn test_forward_without_ttl_has_no_cache_control() {
    let ctx = create_test_state(LinkSettings::default());
    let link = create_test_link(&ctx.state, "https://example.com/plain", None).await;
    let server = test_server(ctx.state);

    let response = from_origin(server.get(&format!("/fw/{}", link.token))).await;

    assert_eq!(response.status_code(), 307);
    assert!(response.headers().get("cache-control").is_none());
}

#[tokio::test]
async fn test_forward_not_found() {
    let ctx = create_test_state(LinkSettings::default());
    let server = test_server(ctx.state);

    let response = from_origin(server.get("/fw/missing1")).await;
    response.assert_status_not_found();

    let response = from_origin(server.get("/aka/missing")).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_forward_disabled_link_is_not_found() {
    let ctx = create_test_state(LinkSettings::default());
    let link = create_test_link(&ctx.state, "https://example.com/off", None).await;
    ctx.state
        .link_service
        .set_enabled(link.id, false)
        .await
        .unwrap();
    let server = test_server(ctx.state);

    let response = from_origin(server.get(&format!("/fw/{}", link.token))).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_forward_records_click() {
    let mut ctx = create_test_state(LinkSettings::default());
    let link = create_test_link(&ctx.state, "https://example.com/click", None).await;
    let server = test_server(ctx.state.clone());

    let response = from_origin(server.get(&format!("/fw/{}", link.token)))
        .add_header("User-Agent", "TestBot/1.0")
        .await;

    assert_eq!(response.status_code(), 307);

    let event = ctx.click_rx.try_recv().unwrap();
    assert_eq!(event.link_id, link.id);
    assert_eq!(event.user_agent.as_deref(), Some("TestBot/1.0"));
    assert_eq!(event.ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_forward_still_redirects_when_click_queue_is_full() {
    let ctx = common::create_test_state_with_capacity(LinkSettings::default(), 1);
    let link = create_test_link(&ctx.state, "https://example.com/busy", None).await;
    let server = test_server(ctx.state.clone());

    for _ in 0..3 {
        let response = from_origin(server.get(&format!("/fw/{}", link.token))).await;
        assert_eq!(response.status_code(), 307);
    }
}

#[tokio::test]
async fn test_forward_rejects_url_pointing_back_at_request_host() {
    // A link registered under one hostname becomes a loop when the service
    // is reached under the hostname the origin URL points to.
    let ctx = create_test_state(LinkSettings::default());
    let link = create_test_link(&ctx.state, "https://mirror.example.com/aka/home", None).await;
    let server = test_server(ctx.state);

    let response = server
        .get(&format!("/fw/{}", link.token))
        .add_header("X-Forwarded-Host", "mirror.example.com")
        .add_header("X-Forwarded-Proto", "https")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["reason"], "invalid_self_reference");
}

#[tokio::test]
async fn test_forward_to_own_endpoint_when_self_redirection_allowed() {
    let ctx = create_test_state(LinkSettings {
        allow_self_redirection: true,
        default_ttl_seconds: None,
    });
    let target = create_test_link(&ctx.state, "https://example.com/final", Some("final")).await;
    let hop = create_test_link(&ctx.state, "https://s.example.com/aka/final", None).await;
    let server = test_server(ctx.state);

    let response = from_origin(server.get(&format!("/fw/{}", hop.token))).await;
    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://s.example.com/aka/final");

    let response = from_origin(server.get("/aka/final")).await;
    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), target.origin_url.as_str());
}
