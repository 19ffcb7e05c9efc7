//! Resolution service driven through the axum router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use site_router::config::ServerConfig;
use site_router::HttpServer;

mod common;

fn server() -> HttpServer {
    HttpServer::new(common::router(), ServerConfig::default())
}

async fn send(server: &HttpServer, host: &str, uri: &str) -> (StatusCode, Option<String>, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("Host", host)
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();

    let response = server.app().oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, request_id, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_resolves_mount() {
    let server = server();
    let (status, request_id, body) = send(&server, "www.example.com", "/preview/news/1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(uuid::Uuid::parse_str(&request_id.unwrap()).is_ok());
    assert_eq!(body["mount_name"], "preview");
    assert_eq!(body["mount_path"], "/preview");
    assert_eq!(body["path_info"], "news/1");
    assert_eq!(body["preview"], true);
    assert_eq!(body["site"], "/sites/example");
    assert_eq!(body["host_group"], "prod");
}

#[tokio::test]
async fn test_creates_link() {
    let server = server();

    let (status, _, body) = send(
        &server,
        "www.example.com",
        "/?link=/content/documents/example/news/2024/kickoff&document=true",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "/news/2024/kickoff.html");

    let (status, _, body) = send(
        &server,
        "www.example.com",
        "/?link=/content/documents/shop/products/chair",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://shop.example.com/products/chair");
    assert_eq!(body["host_name"], "shop.example.com");

    let (status, _, body) = send(
        &server,
        "www.example.com",
        "/?link=/content/documents/example/about&external=true",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://www.example.com/about");
}

#[tokio::test]
async fn test_unlinkable_content_is_not_found() {
    let server = server();
    let (status, _, body) = send(
        &server,
        "www.example.com",
        "/?link=/content/documents/elsewhere",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("/content/documents/elsewhere"));
}

#[tokio::test]
async fn test_routing_failures_are_not_found() {
    let server = server();

    let (status, request_id, body) = send(&server, "unknown.org", "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["request_id"].as_str(), request_id.as_deref());

    let (status, _, body) = send(&server, "localhost:9090", "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("port 9090"));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = server();
    let request = Request::builder()
        .uri("/")
        .header("Host", "www.example.com")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .unwrap();

    let response = server.app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-42");
}

#[tokio::test]
async fn test_served_context_path() {
    let config = ServerConfig {
        context_path: "/site".to_string(),
        ..ServerConfig::default()
    };
    let server = HttpServer::new(common::router(), config);

    let (status, _, body) = send(&server, "www.example.com", "/site/preview/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mount_path"], "/preview");

    let (status, _, _) = send(&server, "www.example.com", "/other").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, body) = send(
        &server,
        "www.example.com",
        "/site/?link=/content/documents/example/about",
    )
    .await;
    assert_eq!(body["url"], "/site/about");
}
