//! Twitter REST API client.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response, multipart};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    config::TwitterConfig,
    decode,
    error::{TwitterError, TwitterResult},
    oauth::{Authorizer, OAuthSigner},
    request::ApiRequest,
    types::Tweet,
};

/// Executes [`ApiRequest`]s and decodes their responses.
#[derive(Debug, Clone)]
pub struct TwitterApiClient {
    client: Client,
    api_url: String,
    upload_url: String,
    authorizer: Option<Arc<dyn Authorizer>>,
    max_status_length: usize,
}

impl TwitterApiClient {
    /// Create a new API client from configuration.
    ///
    /// Requests are signed with an [`OAuthSigner`] when the configuration
    /// carries complete credentials; otherwise the client is anonymous.
    pub fn new(config: &TwitterConfig) -> TwitterResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let authorizer = match &config.credentials {
            Some(credentials) if credentials.is_complete() => {
                Some(Arc::new(OAuthSigner::new(credentials)?) as Arc<dyn Authorizer>)
            }
            _ => None,
        };

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            upload_url: config.upload_url.trim_end_matches('/').to_string(),
            authorizer,
            max_status_length: config.max_status_length,
        })
    }

    /// Replace the credential context used for user-context requests.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Whether user-context requests can be made.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.authorizer.is_some()
    }

    #[must_use]
    pub const fn max_status_length(&self) -> usize {
        self.max_status_length
    }

    /// Fail before any I/O when the request needs credentials we lack.
    pub fn ensure_authorized(&self, request: &ApiRequest) -> TwitterResult<()> {
        let endpoint = request.endpoint();
        if endpoint.requires_auth() && self.authorizer.is_none() {
            return Err(TwitterError::MissingAuthorization {
                operation: endpoint.name(),
            });
        }
        Ok(())
    }

    /// Fetch and decode a single entity.
    pub async fn fetch_one<T: DeserializeOwned>(&self, request: &ApiRequest) -> TwitterResult<T> {
        let body = self.send(request).await?;
        decode::entity(&body)
    }

    /// Fetch and decode a list of entities.
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> TwitterResult<Vec<T>> {
        let body = self.send(request).await?;
        decode::list(&body)
    }

    /// Fetch a list of statuses, newest first.
    pub async fn fetch_timeline(&self, request: &ApiRequest) -> TwitterResult<Vec<Tweet>> {
        let body = self.send(request).await?;
        decode::timeline(&body)
    }

    /// Fetch a list of numeric ids.
    pub async fn fetch_ids(&self, request: &ApiRequest) -> TwitterResult<Vec<u64>> {
        let body = self.send(request).await?;
        decode::ids(&body)
    }

    /// Send a request whose response body carries nothing we need.
    pub async fn execute(&self, request: &ApiRequest) -> TwitterResult<()> {
        self.send(request).await.map(|_| ())
    }

    /// Sign, send and check a request, returning the raw success body.
    #[instrument(skip(self, request), fields(operation = request.endpoint().name()))]
    pub async fn send(&self, request: &ApiRequest) -> TwitterResult<Bytes> {
        self.ensure_authorized(request)?;

        let method = request.method();
        let url = request.url(&self.api_url, &self.upload_url);
        debug!(
            %method,
            path = %request.endpoint().path(),
            query_params = request.query().len(),
            form_params = request.form().len(),
            multipart = request.photo().is_some(),
            "Making Twitter API request"
        );

        let mut req = self.client.request(method.clone(), &url);
        if !request.query().is_empty() {
            req = req.query(request.query());
        }
        req = attach_body(req, &method, request)?;

        if let Some(authorizer) = &self.authorizer {
            let header = authorizer.authorize(&method, &url, &request.signed_params())?;
            req = req.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = req.send().await?;
        self.handle_response(request, response).await
    }

    async fn handle_response(
        &self,
        request: &ApiRequest,
        response: Response,
    ) -> TwitterResult<Bytes> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(bytes);
        }

        let err = TwitterError::from_response(
            status,
            &bytes,
            request.form_value("status"),
            self.max_status_length,
        );
        warn!(
            status = status.as_u16(),
            kind = %err.kind(),
            error = %err,
            "Twitter API request failed"
        );
        Err(err)
    }
}

/// Url-encoded form for plain POSTs; multipart when a photo is attached.
fn attach_body(
    req: RequestBuilder,
    method: &Method,
    request: &ApiRequest,
) -> TwitterResult<RequestBuilder> {
    if let Some(photo) = request.photo() {
        let mut form = multipart::Form::new();
        for (key, value) in request.form() {
            form = form.text(key.clone(), value.clone());
        }
        let data = photo.data().clone();
        let length = data.len() as u64;
        let part = multipart::Part::stream_with_length(data, length)
            .file_name(photo.file_name().to_string())
            .mime_str(photo.media_type().as_mime())?;
        return Ok(req.multipart(form.part("media[]", part)));
    }

    if *method == Method::POST && !request.form().is_empty() {
        return Ok(req.form(request.form()));
    }

    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::request::{Endpoint, Paging};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, header_exists, method, path, query_param},
    };

    /// Create a test config pointing to the mock server.
    fn test_config(mock_server: &MockServer) -> TwitterConfig {
        TwitterConfig {
            credentials: Some(Credentials::new(
                "test_consumer_key",
                "test_consumer_secret",
                "test_access_token",
                "test_access_token_secret",
            )),
            api_url: mock_server.uri(),
            upload_url: mock_server.uri(),
            ..Default::default()
        }
    }

    fn anonymous_config(mock_server: &MockServer) -> TwitterConfig {
        TwitterConfig {
            api_url: mock_server.uri(),
            upload_url: mock_server.uri(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_sends_query_and_signature() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/statuses/home_timeline.json"))
            .and(query_param("page", "2"))
            .and(query_param("count", "10"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = TwitterApiClient::new(&test_config(&mock_server)).unwrap();
        let request = ApiRequest::new(Endpoint::HomeTimeline).paging(&Paging::pages(2, 10));

        let tweets = client.fetch_timeline(&request).await.unwrap();
        assert!(tweets.is_empty());
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/favorites/create/42.json"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/statuses/update.json"))
            .and(body_string_contains("status=Hello+world"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": "Status is a duplicate."
            })))
            .mount(&mock_server)
            .await;

        let client = TwitterApiClient::new(&test_config(&mock_server)).unwrap();
        client
            .execute(&ApiRequest::new(Endpoint::CreateFavorite(42)))
            .await
            .unwrap();

        let update = ApiRequest::new(Endpoint::UpdateStatus).form_param("status", "Hello world");
        let err = client.execute(&update).await.unwrap_err();
        assert!(matches!(err, TwitterError::DuplicateStatus { .. }));
    }

    #[tokio::test]
    async fn test_anonymous_client_refuses_authenticated_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = TwitterApiClient::new(&anonymous_config(&mock_server)).unwrap();
        assert!(!client.is_authorized());

        let err = client
            .fetch_timeline(&ApiRequest::new(Endpoint::Mentions))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TwitterError::MissingAuthorization {
                operation: "mentions"
            }
        ));
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_authorization_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/statuses/public_timeline.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let client = TwitterApiClient::new(&anonymous_config(&mock_server)).unwrap();
        client
            .fetch_timeline(&ApiRequest::new(Endpoint::PublicTimeline))
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_error_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/statuses/mentions.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "Could not authenticate with OAuth."
            })))
            .mount(&mock_server)
            .await;

        let client = TwitterApiClient::new(&test_config(&mock_server)).unwrap();
        let err = client
            .fetch_timeline(&ApiRequest::new(Endpoint::Mentions))
            .await
            .unwrap_err();
        assert!(matches!(err, TwitterError::NotAuthorized { .. }));
    }

    #[tokio::test]
    async fn test_fetch_ids() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/statuses/9/retweeted_by/ids.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                3_333_333, 4_444_444
            ])))
            .mount(&mock_server)
            .await;

        let client = TwitterApiClient::new(&test_config(&mock_server)).unwrap();
        let ids = client
            .fetch_ids(&ApiRequest::new(Endpoint::RetweetedByIds(9)))
            .await
            .unwrap();
        assert_eq!(ids, vec![3_333_333, 4_444_444]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TwitterConfig {
            api_url: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(
            TwitterApiClient::new(&config),
            Err(TwitterError::Config(_))
        ));
    }
}
