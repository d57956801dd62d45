//! Mock Twitter API server.
//!
//! Wraps wiremock with the request and error shapes of the v1 REST API.

use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures;

/// A mock Twitter API for client tests.
pub struct MockApiServer {
    server: MockServer,
}

/// A request the mock server received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request path
    pub path: String,
    /// Decoded query parameters, in order
    pub query: Vec<(String, String)>,
    /// Request body, lossily decoded
    pub body: String,
    /// Request headers, lowercase names
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    fn from_wiremock(request: &wiremock::Request) -> Self {
        Self {
            method: request.method.to_string(),
            path: request.url.path().to_string(),
            query: request
                .url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            body: String::from_utf8_lossy(&request.body).into_owned(),
            headers: request
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect(),
        }
    }

    /// Value of a query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a header, by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl MockApiServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to use as both the API and the upload URL.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Get the underlying wiremock server for advanced configuration.
    #[must_use]
    pub const fn inner(&self) -> &MockServer {
        &self.server
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Response Setup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Respond to GET `request_path` with JSON.
    pub async fn expect_get(&self, request_path: &str, response: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(json_response(200, response))
            .mount(&self.server)
            .await;
    }

    /// Respond to GET `request_path` carrying all of `params` with JSON.
    pub async fn expect_get_with_query(
        &self,
        request_path: &str,
        params: &[(&str, &str)],
        response: serde_json::Value,
    ) {
        let mut mock = Mock::given(method("GET")).and(path(request_path));
        for (name, value) in params {
            mock = mock.and(query_param(*name, *value));
        }
        mock.respond_with(json_response(200, response))
            .mount(&self.server)
            .await;
    }

    /// Respond to POST `request_path` with JSON.
    pub async fn expect_post(&self, request_path: &str, response: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(request_path))
            .respond_with(json_response(200, response))
            .mount(&self.server)
            .await;
    }

    /// Respond to POST `request_path` whose body contains `needle` with JSON.
    pub async fn expect_post_containing(
        &self,
        request_path: &str,
        needle: &str,
        response: serde_json::Value,
    ) {
        Mock::given(method("POST"))
            .and(path(request_path))
            .and(body_string_contains(needle))
            .respond_with(json_response(200, response))
            .mount(&self.server)
            .await;
    }

    /// Respond to any request on `request_path` with a Twitter error body.
    pub async fn expect_error(&self, request_path: &str, status: u16, message: &str, code: i32) {
        Mock::given(path(request_path))
            .respond_with(json_response(status, fixtures::error_body(message, code)))
            .mount(&self.server)
            .await;
    }

    /// Respond to any request on `request_path` with the legacy `{"error": ...}` body.
    pub async fn expect_legacy_error(&self, request_path: &str, status: u16, message: &str) {
        Mock::given(path(request_path))
            .respond_with(json_response(status, fixtures::legacy_error_body(message)))
            .mount(&self.server)
            .await;
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────────

    /// Verify that a specific number of requests were received.
    ///
    /// # Panics
    ///
    /// Panics if the count doesn't match.
    pub async fn assert_request_count(&self, expected: usize) {
        let received = self.received_requests().await;
        assert_eq!(
            received.len(),
            expected,
            "Expected {} requests but received {}",
            expected,
            received.len()
        );
    }

    /// Verify that at least one request was received to the given path.
    ///
    /// # Panics
    ///
    /// Panics if no matching request was found.
    pub async fn assert_received(&self, request_path: &str) {
        let received = self.received_requests().await;
        assert!(
            received.iter().any(|r| r.path == request_path),
            "No request received to path '{}'. Received: {:?}",
            request_path,
            received.iter().map(|r| r.path.as_str()).collect::<Vec<_>>()
        );
    }

    /// Verify that no requests were received.
    ///
    /// # Panics
    ///
    /// Panics if any requests were received.
    pub async fn assert_no_requests(&self) {
        let received = self.received_requests().await;
        assert!(
            received.is_empty(),
            "Expected no requests but received {}: {:?}",
            received.len(),
            received.iter().map(|r| r.path.as_str()).collect::<Vec<_>>()
        );
    }

    /// All received requests, oldest first.
    pub async fn received_requests(&self) -> Vec<RecordedRequest> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(RecordedRequest::from_wiremock)
            .collect()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.received_requests().await.pop()
    }
}

fn json_response(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_json(body)
        .insert_header("content-type", "application/json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_get_with_query() {
        let mock = MockApiServer::start().await;
        mock.expect_get_with_query(
            "/statuses/home_timeline.json",
            &[("count", "5")],
            serde_json::json!([]),
        )
        .await;

        let response = reqwest::Client::new()
            .get(format!("{}/statuses/home_timeline.json?count=5", mock.base_url()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let recorded = mock.last_request().await.unwrap();
        assert_eq!(recorded.method, "GET");
        assert_eq!(recorded.query_value("count"), Some("5"));
    }

    #[tokio::test]
    async fn test_mock_server_post_records_body() {
        let mock = MockApiServer::start().await;
        mock.expect_post("/favorites/create/1.json", serde_json::json!({}))
            .await;

        reqwest::Client::new()
            .post(format!("{}/favorites/create/1.json", mock.base_url()))
            .header("Authorization", "OAuth test")
            .body("a=b")
            .send()
            .await
            .unwrap();

        mock.assert_received("/favorites/create/1.json").await;
        let recorded = mock.last_request().await.unwrap();
        assert_eq!(recorded.body, "a=b");
        assert_eq!(recorded.header("authorization"), Some("OAuth test"));
    }

    #[tokio::test]
    async fn test_mock_server_error() {
        let mock = MockApiServer::start().await;
        mock.expect_error("/statuses/show/9.json", 404, "No status found", 144)
            .await;

        let response = reqwest::Client::new()
            .get(format!("{}/statuses/show/9.json", mock.base_url()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["errors"][0]["code"], 144);
    }
}
