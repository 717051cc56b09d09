//! Helpers for driving routers with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Request with no body.
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// Request with `body` serialized as JSON.
pub fn json_request<T: Serialize>(method: Method, uri: &str, body: &T) -> Request<Body> {
    let bytes = serde_json::to_vec(body).expect("serializable body");
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("valid request")
}

/// Collects and deserializes a JSON response body.
pub async fn json_body<T: DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.expect("readable body").to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "body is not the expected JSON ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Collects an error body (`string -> string` map).
pub async fn error_body(body: Body) -> BTreeMap<String, String> {
    json_body(body).await
}
