//! Client configuration: optional TOML file, then environment overrides.
//!
//! ```toml
//! api_url = "https://api.twitter.com/1"
//! timeout = 30
//!
//! [credentials]
//! consumer_key = "..."
//! consumer_secret = "..."
//! access_token = "..."
//! access_token_secret = "..."
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use twitter_timeline::{Credentials, TwitterConfig};

pub const CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
pub const ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
pub const API_URL: &str = "TWITTER_API_URL";
pub const UPLOAD_URL: &str = "TWITTER_UPLOAD_URL";

/// Load the configuration file, if any, and apply environment overrides.
pub fn load(path: Option<&Path>) -> Result<TwitterConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse(&text).with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => TwitterConfig::default(),
    };

    let config = apply_env(config, |name| std::env::var(name).ok());
    debug!(
        api_url = %config.api_url,
        authorized = config.is_authorized(),
        "Loaded configuration"
    );
    Ok(config)
}

fn parse(text: &str) -> Result<TwitterConfig> {
    Ok(toml::from_str(text)?)
}

/// Overlay non-empty environment values onto `config`.
fn apply_env(mut config: TwitterConfig, lookup: impl Fn(&str) -> Option<String>) -> TwitterConfig {
    let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(url) = var(API_URL) {
        config.api_url = url;
    }
    if let Some(url) = var(UPLOAD_URL) {
        config.upload_url = url;
    }

    let overrides = [
        var(CONSUMER_KEY),
        var(CONSUMER_SECRET),
        var(ACCESS_TOKEN),
        var(ACCESS_TOKEN_SECRET),
    ];
    if overrides.iter().any(Option::is_some) {
        let mut credentials = config.credentials.take().unwrap_or_default();
        let [consumer_key, consumer_secret, access_token, access_token_secret] = overrides;
        let fields = [
            (&mut credentials.consumer_key, consumer_key),
            (&mut credentials.consumer_secret, consumer_secret),
            (&mut credentials.access_token, access_token),
            (&mut credentials.access_token_secret, access_token_secret),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        config.credentials = Some(credentials);
    }

    config
}

/// Environment variable names of the credential values that are still empty.
#[must_use]
pub fn missing_credential_vars(credentials: Option<&Credentials>) -> Vec<&'static str> {
    let empty = Credentials::default();
    let credentials = credentials.unwrap_or(&empty);
    [
        (CONSUMER_KEY, &credentials.consumer_key),
        (CONSUMER_SECRET, &credentials.consumer_secret),
        (ACCESS_TOKEN, &credentials.access_token),
        (ACCESS_TOKEN_SECRET, &credentials.access_token_secret),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_file() {
        let config = parse(
            r#"
            api_url = "http://localhost:9000/1"
            timeout = 5

            [credentials]
            consumer_key = "ck"
            consumer_secret = "cs"
            access_token = "at"
            access_token_secret = "ats"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:9000/1");
        assert_eq!(config.upload_url, "https://upload.twitter.com/1");
        assert_eq!(config.timeout.as_secs(), 5);
        assert!(config.is_authorized());
    }

    #[test]
    fn test_env_overrides_file() {
        let config = parse("[credentials]\nconsumer_key = \"file-key\"\n").unwrap();
        let config = apply_env(
            config,
            env(&[
                (CONSUMER_SECRET, "cs"),
                (ACCESS_TOKEN, "at"),
                (ACCESS_TOKEN_SECRET, "ats"),
                (API_URL, "http://127.0.0.1:1/1"),
            ]),
        );

        let credentials = config.credentials.as_ref().unwrap();
        assert_eq!(credentials.consumer_key, "file-key");
        assert_eq!(credentials.access_token, "at");
        assert!(config.is_authorized());
        assert_eq!(config.api_url, "http://127.0.0.1:1/1");
    }

    #[test]
    fn test_empty_env_is_anonymous() {
        let config = apply_env(TwitterConfig::default(), env(&[(CONSUMER_KEY, "")]));
        assert!(config.credentials.is_none());
        assert_eq!(missing_credential_vars(config.credentials.as_ref()).len(), 4);
    }

    #[test]
    fn test_missing_credential_vars() {
        let credentials = Credentials::new("ck", "", "at", "");
        assert_eq!(
            missing_credential_vars(Some(&credentials)),
            vec![CONSUMER_SECRET, ACCESS_TOKEN_SECRET]
        );
    }
}
