//! OAuth 1.0a request signing.
//!
//! User-context requests carry an `Authorization: OAuth ...` header whose
//! signature covers the method, the URL without query, and every query and
//! url-encoded form parameter. Multipart bodies are not part of the signature.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use rand::RngCore;
use reqwest::Method;
use sha1::Sha1;

use crate::config::Credentials;
use crate::error::{TwitterError, TwitterResult};

/// RFC 3986 reserved characters; only ALPHA / DIGIT / "-" / "." / "_" / "~" pass through.
const OAUTH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Produces the `Authorization` header for a user-context request.
pub trait Authorizer: Send + Sync + fmt::Debug {
    /// Header value for a request to `url` (no query string) with the given
    /// query and form parameters.
    fn authorize(
        &self,
        method: &Method,
        url: &str,
        params: &[(String, String)],
    ) -> TwitterResult<String>;
}

/// OAuth 1.0a HMAC-SHA1 signer.
pub struct OAuthSigner {
    credentials: Credentials,
}

impl fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &self.credentials.consumer_key)
            .finish_non_exhaustive()
    }
}

impl OAuthSigner {
    /// Create a signer from complete credentials.
    pub fn new(credentials: &Credentials) -> TwitterResult<Self> {
        if !credentials.is_complete() {
            return Err(TwitterError::OAuth(
                "consumer key/secret and access token/secret are all required".into(),
            ));
        }
        Ok(Self {
            credentials: credentials.clone(),
        })
    }

    /// Sign with an explicit timestamp and nonce.
    pub fn sign_with(
        &self,
        method: &Method,
        url: &str,
        params: &[(String, String)],
        timestamp: &str,
        nonce: &str,
    ) -> TwitterResult<String> {
        let mut oauth_params = vec![
            (
                "oauth_consumer_key".to_string(),
                self.credentials.consumer_key.clone(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            (
                "oauth_token".to_string(),
                self.credentials.access_token.clone(),
            ),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        // Sorting happens on the encoded pairs
        let mut encoded: Vec<(String, String)> = oauth_params
            .iter()
            .chain(params.iter())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.as_str().to_uppercase(),
            percent_encode(url),
            percent_encode(&param_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.credentials.consumer_secret),
            percent_encode(&self.credentials.access_token_secret)
        );

        let signature = hmac_sha1(&signing_key, &base_string)?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }
}

impl Authorizer for OAuthSigner {
    fn authorize(
        &self,
        method: &Method,
        url: &str,
        params: &[(String, String)],
    ) -> TwitterResult<String> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| TwitterError::OAuth(format!("Failed to get timestamp: {e}")))?
            .as_secs()
            .to_string();

        self.sign_with(method, url, params, &timestamp, &generate_nonce())
    }
}

/// Percent-encode a string according to RFC 3986.
fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// HMAC-SHA1, base64-encoded.
fn hmac_sha1(key: &str, data: &str) -> TwitterResult<String> {
    type HmacSha1 = Hmac<Sha1>;

    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| TwitterError::OAuth(e.to_string()))?;

    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_credentials() -> Credentials {
        Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("foo=bar&baz"), "foo%3Dbar%26baz");
        assert_eq!(percent_encode("test-value_123.txt"), "test-value_123.txt");
        assert_eq!(percent_encode("~tilde"), "~tilde");
        assert_eq!(percent_encode("caf\u{e9}"), "caf%C3%A9");
    }

    #[test]
    fn test_generate_nonce() {
        let nonce1 = generate_nonce();
        let nonce2 = generate_nonce();

        assert_ne!(nonce1, nonce2);
        assert_eq!(nonce1.len(), 32);
        assert!(nonce1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_matches_published_example() {
        let signer = OAuthSigner::new(&doc_credentials()).unwrap();
        let params = vec![
            (
                "status".to_string(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
            ),
            ("include_entities".to_string(), "true".to_string()),
        ];

        let header = signer
            .sign_with(
                &Method::POST,
                "https://api.twitter.com/1.1/statuses/update.json",
                &params,
                "1318622958",
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            )
            .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_timestamp=\"1318622958\""));
        assert!(!header.contains("status="));
    }

    #[test]
    fn test_authorize_produces_fresh_header() {
        let signer = OAuthSigner::new(&doc_credentials()).unwrap();
        let header = signer
            .authorize(
                &Method::GET,
                "https://api.twitter.com/1/statuses/home_timeline.json",
                &[],
            )
            .unwrap();

        assert!(header.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature="));
        assert!(header.contains("oauth_nonce="));
    }

    #[test]
    fn test_incomplete_credentials_rejected() {
        let creds = Credentials::new("key", "secret", "", "");
        assert!(matches!(OAuthSigner::new(&creds), Err(TwitterError::OAuth(_))));
    }
}
