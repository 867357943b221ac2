//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert the response status, showing the body on mismatch
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Unexpected status; body: {}",
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert a 200 response carrying a PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert_eq!(
        response
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    assert!(
        response.is_png(),
        "Body is not a PNG ({} bytes)",
        response.body.len()
    );
}

/// Assert an `ApiError` body: HTTP status plus matching `{status, error}` JSON
pub fn assert_api_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(u64::from(expected.as_u16())));
    assert!(
        json["error"].as_str().is_some_and(|e| !e.is_empty()),
        "Missing error message in {json}"
    );
}
