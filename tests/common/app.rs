//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use crush_dither::RasterBuffer;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pixelcrush::models::AppConfig;
use pixelcrush::server::{build_router, create_app_state, AppState};
use pixelcrush::services::decode_png;

/// Test application with router and direct access to state
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        Self::from_state(create_app_state(config))
    }

    /// Create a test application over existing state
    pub fn from_state(state: AppState) -> Self {
        // Build router using shared server module (same as production)
        let router = build_router(state.clone());

        Self { router, state }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a DELETE request to the given path
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with a PNG body
    pub async fn post_png(&self, path: &str, headers: &[(&str, &str)], png: Vec<u8>) -> TestResponse {
        let mut builder = Request::post(path).header("Content-Type", "image/png");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::from(png)).unwrap()).await
    }

    /// Upload a PNG to the image palette import endpoint
    pub async fn post_png_import(&self, png: Vec<u8>) -> TestResponse {
        self.post_png("/api/palettes/image", &[], png).await
    }

    /// Make a POST request with a text body
    pub async fn post_text(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "text/plain")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Import a hex palette and return its id
    pub async fn import_hex(&self, hex_list: &str) -> String {
        let response = self.post_text("/api/palettes/hex", hex_list).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());

        let json: serde_json::Value = response.json();
        json["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the PNG body
    pub fn image(&self) -> RasterBuffer {
        decode_png(&self.body, u64::MAX).expect("Failed to decode PNG response")
    }
}
