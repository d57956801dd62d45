//! Twitter client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TwitterError, TwitterResult};

/// OAuth 1.0a credentials for user-context requests.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// OAuth 1.0a Consumer Key (API Key)
    pub consumer_key: String,

    /// OAuth 1.0a Consumer Secret (API Secret)
    pub consumer_secret: String,

    /// OAuth 1.0a Access Token
    pub access_token: String,

    /// OAuth 1.0a Access Token Secret
    pub access_token_secret: String,
}

impl Credentials {
    /// Create credentials from the four OAuth 1.0a values.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    /// Whether every value needed to sign a request is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !(self.consumer_key.is_empty()
            || self.consumer_secret.is_empty()
            || self.access_token.is_empty()
            || self.access_token_secret.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for the Twitter client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// User credentials; anonymous when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    /// Base URL for the REST API (default: https://api.twitter.com/1)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL for media uploads (default: https://upload.twitter.com/1)
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Longest status text accepted before a request is sent
    #[serde(default = "default_max_status_length")]
    pub max_status_length: usize,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    "https://api.twitter.com/1".into()
}

fn default_upload_url() -> String {
    "https://upload.twitter.com/1".into()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_max_status_length() -> usize {
    140
}

fn default_user_agent() -> String {
    format!("twitter-timeline/{}", env!("CARGO_PKG_VERSION"))
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            api_url: default_api_url(),
            upload_url: default_upload_url(),
            timeout: default_timeout(),
            max_status_length: default_max_status_length(),
            user_agent: default_user_agent(),
        }
    }
}

impl TwitterConfig {
    /// Configuration for anonymous access only.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Configuration carrying user credentials.
    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..Self::default()
        }
    }

    /// Whether user-context requests can be signed.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.credentials.as_ref().is_some_and(Credentials::is_complete)
    }

    /// Check the configuration before a client is built from it.
    pub fn validate(&self) -> TwitterResult<()> {
        for (name, value) in [("api_url", &self.api_url), ("upload_url", &self.upload_url)] {
            let parsed = url::Url::parse(value)
                .map_err(|e| TwitterError::Config(format!("{name} is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(TwitterError::Config(format!(
                    "{name} must use http or https, got {}",
                    parsed.scheme()
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(TwitterError::Config("timeout must be non-zero".into()));
        }
        if self.max_status_length == 0 {
            return Err(TwitterError::Config(
                "max_status_length must be non-zero".into(),
            ));
        }

        Ok(())
    }
}
