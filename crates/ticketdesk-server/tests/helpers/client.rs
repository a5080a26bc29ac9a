//! Test client helpers.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Drives the router in-process, one request per call.
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    /// GET sin headers extra.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.get_with_headers(uri, Vec::new()).await
    }

    /// GET con headers personalizados.
    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        let request = headers
            .into_iter()
            .fold(Request::get(uri), |builder, (name, value)| builder.header(name, value))
            .body(Body::empty())
            .unwrap();

        self.request(request).await
    }

    /// GET /api/search/orders con el query string dado (sin `?`).
    pub async fn search(&self, query_string: &str) -> TestResponse {
        self.get(&format!("/api/search/orders?{query_string}")).await
    }

    /// GET /api/orders/{id}.
    pub async fn order(&self, order_line_id: &str) -> TestResponse {
        self.get(&format!("/api/orders/{order_line_id}")).await
    }

    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.text()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Ids de `data` en una respuesta de busqueda, en orden.
    pub fn order_ids(&self) -> Vec<String> {
        let body: Value = self.json();
        body["data"]
            .as_array()
            .unwrap_or_else(|| panic!("no data array in {body}"))
            .iter()
            .map(|order| order["orderLineId"].as_str().unwrap().to_string())
            .collect()
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(self.status, expected, "unexpected status, body: {}", self.text());
        self
    }

    pub fn assert_content_type_contains(&self, expected: &str) -> &Self {
        let content_type = self.header("content-type").unwrap_or_default();
        assert!(
            content_type.contains(expected),
            "content-type {content_type:?} does not contain {expected:?}"
        );
        self
    }

    /// Verifica el sobre de error `{ success: false, error, .. }` y lo devuelve.
    pub fn assert_error(&self, status: StatusCode, error: &str) -> Value {
        self.assert_status(status)
            .assert_content_type_contains("application/json");
        let body: Value = self.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], error);
        body
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(self.headers.contains_key(name), "missing header {name}");
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        assert_eq!(self.header(name), Some(expected), "header {name}");
        self
    }
}
