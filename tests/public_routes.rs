//! End-to-end tests for the unauthenticated surface: blog, chat and health.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{client, test_config, Gateway, MockReply, MockUpstream};

#[tokio::test]
async fn test_blog_listing_is_fetched_from_blog_origin() {
    let api = MockUpstream::start(|_| MockReply::json(500, "{}")).await;
    let blog = MockUpstream::start(|_| MockReply::json(200, r#"{"posts":[{"slug":"sleep"}]}"#)).await;

    let mut config = test_config(&api.url());
    config.upstream.blog_url = Some(blog.url());
    let gateway = Gateway::start(config).await;

    let res = client().get(gateway.url("/api/blog/posts?page=2")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap()["posts"][0]["slug"], "sleep");

    let seen = blog.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].target, "/posts?page=2");
    assert_eq!(seen[0].header("accept"), Some("application/json"));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_blog_post_by_slug() {
    let blog = MockUpstream::start(|_| MockReply::json(200, r#"{"slug":"sleep"}"#)).await;
    let gateway = Gateway::start(test_config(&blog.url())).await;

    let res = client().get(gateway.url("/api/blog/posts/sleep")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(blog.requests()[0].target, "/posts/sleep");
}

#[tokio::test]
async fn test_blog_failure_is_reported() {
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let gateway = Gateway::start(test_config(&format!("http://{}", dead_addr))).await;
    let res = client().get(gateway.url("/api/blog/posts")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch blog posts");
}

#[tokio::test]
async fn test_health() {
    let gateway = Gateway::start(test_config("http://127.0.0.1:9")).await;

    let res = client().get(gateway.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap()["status"], "ok");
}

#[tokio::test]
async fn test_chat_reply_and_request_id() {
    let gateway = Gateway::start(test_config("http://127.0.0.1:9")).await;

    let res = client()
        .post(gateway.url("/api/chat"))
        .json(&json!({
            "persona": { "id": "dr-lee", "name": "Dr. Lee", "specialty": "Sleep medicine" },
            "message": "  I can't sleep  "
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert!(!body["reply"].as_str().unwrap().is_empty());
    assert_eq!(body["messages"][0]["content"], "I can't sleep");
    assert_eq!(body["messages"][1]["role"], "assistant");
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let gateway = Gateway::start(test_config("http://127.0.0.1:9")).await;

    let res = client()
        .post(gateway.url("/api/chat"))
        .json(&json!({ "persona": { "id": "dr-lee", "name": "Dr. Lee" }, "message": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
