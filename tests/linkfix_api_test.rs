use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use link_fixer::{router, DiscordWebhook, LinkFixService, RuleSet};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(webhook_url: Option<String>) -> Router {
    app_with_timeout(webhook_url, Duration::from_secs(5))
}

fn app_with_timeout(webhook_url: Option<String>, timeout: Duration) -> Router {
    let relay = DiscordWebhook::new(webhook_url, timeout);
    let service = LinkFixService::new(Arc::new(RuleSet::default()), relay);
    router(Arc::new(service))
}

async fn post_linkfix(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/linkfix")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_fix_single_url_without_webhook() {
    let (status, body) = post_linkfix(
        app(None),
        json!({ "url": "https://twitter.com/user/status/123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "original": "https://twitter.com/user/status/123",
            "fixed": "https://vxtwitter.com/user/status/123",
            "platforms": ["twitter.com", "x.com", "reddit.com"]
        })
    );
}

#[tokio::test]
async fn test_fix_text_with_multiple_links() {
    let (status, body) = post_linkfix(
        app(None),
        json!({ "text": "See https://reddit.com/r/funny and https://x.com/u/1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["fixed"],
        "See https://vxreddit.com/r/funny and https://vxtwitter.com/u/1"
    );
    assert_eq!(
        body["original"],
        "See https://reddit.com/r/funny and https://x.com/u/1"
    );
}

#[tokio::test]
async fn test_url_wins_over_text() {
    let (status, body) = post_linkfix(
        app(None),
        json!({ "url": "https://x.com/a", "text": "https://reddit.com/r/b" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original"], "https://x.com/a");
    assert_eq!(body["fixed"], "https://vxtwitter.com/a");
}

#[tokio::test]
async fn test_missing_content_returns_usage_and_skips_webhook() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(204);
        })
        .await;

    for body in [json!({}), json!({ "url": "", "username": "someone" }), json!({ "text": null })] {
        let (status, response) = post_linkfix(app(Some(server.url("/hook"))), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "No URL or text provided");
        assert!(!response["usage"].as_str().unwrap_or_default().is_empty());
    }

    hook.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_relays_fixed_content_to_webhook() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .json_body(json!({
                    "content": "https://vxreddit.com/r/rust",
                    "username": "Link Fixer"
                }));
            then.status(204);
        })
        .await;

    let (status, body) = post_linkfix(
        app(Some(server.url("/hook"))),
        json!({ "url": "https://reddit.com/r/rust" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fixed"], "https://vxreddit.com/r/rust");
    hook.assert_async().await;
}

#[tokio::test]
async fn test_relay_uses_custom_username() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook").json_body(json!({
                "content": "check https://vxtwitter.com/a/status/1",
                "username": "news-bot"
            }));
            then.status(200).body("ok");
        })
        .await;

    let (status, _) = post_linkfix(
        app(Some(server.url("/hook"))),
        json!({ "text": "check https://X.com/a/status/1", "username": "news-bot" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    hook.assert_async().await;
}

#[tokio::test]
async fn test_webhook_error_status_is_not_reported() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(500);
        })
        .await;

    let (status, body) = post_linkfix(
        app(Some(server.url("/hook"))),
        json!({ "url": "https://twitter.com/a" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    hook.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_webhook_is_generic_server_error() {
    // 沒有服務在聽的 port
    let (status, body) = post_linkfix(
        app(Some("http://127.0.0.1:9/hook".to_string())),
        json!({ "url": "https://twitter.com/a" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to process links" }));
}

#[tokio::test]
async fn test_hung_webhook_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/slow");
            then.status(204).delay(Duration::from_secs(3));
        })
        .await;

    let (status, body) = post_linkfix(
        app_with_timeout(Some(server.url("/slow")), Duration::from_millis(200)),
        json!({ "text": "https://x.com/1" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process links");
}

async fn post_raw(
    app: Router,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri("/linkfix");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = app.oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_malformed_json_returns_usage() {
    let (status, body) = post_raw(app(None), Some("application/json"), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    assert!(!body["usage"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_wrong_field_type_is_generic_server_error() {
    let (status, body) = post_linkfix(app(None), json!({ "url": 5 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to process links" }));
}

#[tokio::test]
async fn test_non_json_requests_are_treated_as_empty() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(204);
        })
        .await;

    let cases = [
        (None, ""),
        (None, r#"{"url": "https://x.com/1"}"#),
        (Some("application/x-www-form-urlencoded"), r#"{"url": "https://x.com/1"}"#),
        (Some("application/json"), ""),
    ];

    for (content_type, raw) in cases {
        let (status, body) = post_raw(app(Some(server.url("/hook"))), content_type, raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No URL or text provided");
        assert!(!body["usage"].as_str().unwrap().is_empty());
    }

    hook.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_service_info() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Multi-Platform Link Fixer is running");
    assert_eq!(
        body["supported_platforms"],
        json!({
            "twitter.com": "vxtwitter.com",
            "x.com": "vxtwitter.com",
            "reddit.com": "vxreddit.com"
        })
    );
    assert_eq!(body["endpoints"]["/linkfix"]["method"], "POST");
    assert!(body["endpoints"]["/linkfix"]["parameters"]["username"].is_string());
    assert!(body["endpoints"]["/linkfix"]["examples"]["single_url"].is_string());
}
