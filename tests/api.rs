//! HTTP-level tests for the words and subscription endpoints.
//!
//! Each test builds the router against its own in-memory SQLite database and,
//! where the feed is needed, a wiremock upstream.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use palavra::server::{router, AppState};
use palavra::storage::Database;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0"><channel>
<item>
<title>cálido</title>
<link>https://dicionario.priberam.org/cálido</link>
<pubDate>Mon, 05 May 2025 00:00:00 GMT</pubDate>
<description>&lt;span class=&quot;--pequeno&quot;&gt;adjectivo&lt;/span&gt;&lt;div class=&quot;dp-definicao-linha&quot;&gt;&lt;span class=&quot;h6 --pequeno&quot;&gt;1.&lt;/span&gt;&lt;span class=&quot;p&quot;&gt;Quente.&lt;/span&gt;&lt;/div&gt;</description>
</item>
</channel></rss>"#;

async fn test_app(feed_url: &str) -> (axum::Router, Database) {
    let db = Database::open(":memory:").await.unwrap();
    let state = AppState::new(reqwest::Client::new(), feed_url, db.clone());
    (router(state, None), db)
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Words
// ============================================================================

#[tokio::test]
async fn test_words_success() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(&upstream)
        .await;

    let (app, _db) = test_app(&upstream.uri()).await;
    let resp = app
        .oneshot(Request::builder().uri("/api/words").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["words"][0]["word"], "cálido");
    assert_eq!(body["words"][0]["date"], "05/05/2025");
    assert_eq!(body["words"][0]["wordClasses"], json!(["adjectivo"]));
    assert_eq!(
        body["words"][0]["meanings"],
        json!([{"number": "1.", "text": "Quente.", "wordClass": "adjectivo"}])
    );
}

#[tokio::test]
async fn test_words_legacy_path() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(&upstream)
        .await;

    let (app, _db) = test_app(&upstream.uri()).await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/.netlify/functions/getWords")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_words_upstream_failure_is_generic_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let (app, _db) = test_app(&upstream.uri()).await;
    let resp = app
        .oneshot(Request::builder().uri("/api/words").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        json!({"error": "Failed to fetch the words of the day"})
    );
}

#[tokio::test]
async fn test_words_empty_feed() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel/></rss>"))
        .mount(&upstream)
        .await;

    let (app, _db) = test_app(&upstream.uri()).await;
    let resp = app
        .oneshot(Request::builder().uri("/api/words").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"words": []}));
}

// ============================================================================
// Subscribe
// ============================================================================

#[tokio::test]
async fn test_subscribe_then_duplicate() {
    let (app, db) = test_app("http://127.0.0.1:1/unused").await;

    let resp = app
        .clone()
        .oneshot(post_json("/api/subscribe", r#"{"email": "a@b.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"success": true, "message": "Email subscribed successfully"})
    );

    let resp = app
        .oneshot(post_json("/api/subscribe", r#"{"email": "a@b.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        json!({"error": "This email is already subscribed"})
    );

    assert_eq!(db.subscriber_emails().await.unwrap(), vec!["a@b.com"]);
}

#[tokio::test]
async fn test_subscribe_invalid_email_not_stored() {
    let (app, db) = test_app("http://127.0.0.1:1/unused").await;

    let resp = app
        .oneshot(post_json("/api/subscribe", r#"{"email": "not-an-email"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({"error": "Invalid email address"}));
    assert!(db.subscriber_emails().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_subscribe_missing_or_non_string_email() {
    let (app, _db) = test_app("http://127.0.0.1:1/unused").await;

    for body in [r#"{}"#, r#"{"email": 42}"#, r#"{"email": ""}"#, r#"[]"#] {
        let resp = app
            .clone()
            .oneshot(post_json("/api/subscribe", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_subscribe_malformed_json() {
    let (app, _db) = test_app("http://127.0.0.1:1/unused").await;

    let resp = app
        .oneshot(post_json("/api/subscribe", "{email"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({"error": "Server error"}));
}

#[tokio::test]
async fn test_subscribe_null_body_is_server_error() {
    let (app, db) = test_app("http://127.0.0.1:1/unused").await;

    let resp = app
        .oneshot(post_json("/api/subscribe", "null"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({"error": "Server error"}));
    assert!(db.subscriber_emails().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_subscribe_requires_post() {
    let (app, _db) = test_app("http://127.0.0.1:1/unused").await;

    for uri in ["/api/subscribe", "/.netlify/functions/submitEmail"] {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(resp).await, json!({"error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn test_subscribe_storage_failure_is_500() {
    let (app, db) = test_app("http://127.0.0.1:1/unused").await;
    db.close().await;

    let resp = app
        .oneshot(post_json("/api/subscribe", r#"{"email": "a@b.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({"error": "Failed to save email"}));
}
