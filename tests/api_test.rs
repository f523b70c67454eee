//! Router tests driving `/api/download` through tower without binding a socket.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tiktok_resolver::resolver::{normalize, NormalizedResult, RawMedia, ResolutionChain};
use tiktok_resolver::{router, AppState, ResolutionError, Resolver};
use tower::ServiceExt;

const ENCODED_SOURCE: &str = "https%3A%2F%2Fvm.tiktok.com%2FZMexample%2F";

enum Mode {
    Found,
    Missing,
    Explode,
}

struct StubResolver(Mode);

#[async_trait]
impl Resolver for StubResolver {
    fn id(&self) -> &'static str {
        "tikwm_api"
    }

    async fn resolve(&self, source_url: &str) -> Result<Option<NormalizedResult>, ResolutionError> {
        match self.0 {
            Mode::Found => {
                let raw = RawMedia::new("/video123.mp4", "https://www.tikwm.com")
                    .unwrap()
                    .with_title(Some("Cat".to_string()))
                    .with_author(Some("catlover".to_string()));
                Ok(Some(normalize(raw, source_url, "tikwm_api")))
            }
            Mode::Missing => Ok(None),
            Mode::Explode => panic!("upstream returned garbage"),
        }
    }
}

fn app(mode: Mode) -> axum::Router {
    let chain = ResolutionChain::builder()
        .with(Arc::new(StubResolver(mode)))
        .build()
        .expect("chain");
    router(AppState::new(chain))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, header::HeaderMap, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ORIGIN, "https://app.example")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn resolves_url_into_success_payload() {
    let uri = format!("/api/download?url={}", ENCODED_SOURCE);
    let (status, headers, body) = send(app(Mode::Found), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["downloadURL"], "https://www.tikwm.com/video123.mp4");
    assert_eq!(body["data"]["title"], "Cat");
    assert_eq!(body["data"]["author"], "catlover");
    assert_eq!(body["data"]["originalURL"], "https://vm.tiktok.com/ZMexample/");
    assert_eq!(body["data"]["method"], "tikwm_api");
}

#[tokio::test]
async fn missing_url_is_bad_request() {
    for uri in ["/api/download", "/api/download?url=", "/api/download?other=1"] {
        let (status, _, body) = send(app(Mode::Found), get(uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(body["error"], "URL parameter is required");
        assert!(body["usage"].as_str().unwrap().contains("/api/download?url="));
    }
}

#[tokio::test]
async fn repeated_url_parameter_uses_first() {
    let uri = format!(
        "/api/download?url={}&url=https%3A%2F%2Fvm.tiktok.com%2Fsecond",
        ENCODED_SOURCE
    );
    let (status, headers, body) = send(app(Mode::Found), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body["data"]["originalURL"], "https://vm.tiktok.com/ZMexample/");
}

#[tokio::test]
async fn unreadable_query_is_json_bad_request() {
    for uri in ["/api/download?url", "/api/download?=%zz&url=%20"] {
        let (status, headers, body) = send(app(Mode::Found), get(uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(body["error"], "URL parameter is required");
    }
}

#[tokio::test]
async fn exhausted_chain_is_not_found() {
    let uri = format!("/api/download?url={}", ENCODED_SOURCE);
    let (status, _, body) = send(app(Mode::Missing), get(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "All resolution methods failed");
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/download")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app(Mode::Found), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn options_preflight_allows_get() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/download")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(app(Mode::Found), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("GET"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn handler_panic_becomes_internal_error() {
    let uri = format!("/api/download?url={}", ENCODED_SOURCE);
    let (status, _, body) = send(app(Mode::Explode), get(&uri)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["message"], "upstream returned garbage");
}

#[tokio::test]
async fn health_lists_resolvers() {
    let (status, _, body) = send(app(Mode::Found), get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["resolvers"], serde_json::json!(["tikwm_api"]));
}
