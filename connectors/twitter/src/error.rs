//! Twitter-specific error types.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Broad category of a [`TwitterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network, HTTP or decoding failure
    Transport,
    /// Missing or rejected credentials
    Authorization,
    /// The requested entity does not exist
    NotFound,
    /// The request content was rejected (length, duplicate, media format)
    Validation,
    /// The action is not permitted
    Permission,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Permission => "permission",
        };
        f.write_str(name)
    }
}

/// Twitter-specific errors.
#[derive(Error, Debug)]
pub enum TwitterError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Twitter API returned an error that maps to no narrower variant
    #[error("Twitter API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        error_code: Option<i32>,
    },

    /// OAuth signature generation failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation that needs user credentials was called without them
    #[error("{operation} requires OAuth credentials")]
    MissingAuthorization { operation: &'static str },

    /// Twitter rejected the credentials (HTTP 401)
    #[error("Not authorized: {message}")]
    NotAuthorized { message: String },

    /// The requested resource does not exist (HTTP 404)
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Status text is longer than the limit
    ///
    /// `message` carries Twitter's own wording when it rejected text that was
    /// within `limit` locally (links count at their wrapped length).
    #[error("{}", too_long(.length, .limit, .message.as_deref()))]
    StatusTooLong {
        length: usize,
        limit: usize,
        message: Option<String>,
    },

    /// Status text is empty
    #[error("Status text is empty")]
    EmptyStatus,

    /// Status duplicates one already posted
    #[error("Duplicate status: {message}")]
    DuplicateStatus { message: String },

    /// Photo is an image, but not GIF, JPEG or PNG
    #[error("Unsupported photo media type {media_type}; expected GIF, JPEG or PNG")]
    UnsupportedMediaType { media_type: String },

    /// Twitter refused the action (HTTP 403), or the attachment is not an image
    #[error("Operation not permitted: {message}")]
    OperationNotPermitted { message: String },
}

impl TwitterError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Json(_) | Self::Api { .. } | Self::OAuth(_) | Self::Config(_) => {
                ErrorKind::Transport
            }
            Self::MissingAuthorization { .. } | Self::NotAuthorized { .. } => {
                ErrorKind::Authorization
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StatusTooLong { .. }
            | Self::EmptyStatus
            | Self::DuplicateStatus { .. }
            | Self::UnsupportedMediaType { .. } => ErrorKind::Validation,
            Self::OperationNotPermitted { .. } => ErrorKind::Permission,
        }
    }

    /// HTTP status of the response that produced this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            Self::NotAuthorized { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::DuplicateStatus { .. }
            | Self::OperationNotPermitted { .. }
            | Self::StatusTooLong {
                message: Some(_), ..
            } => Some(403),
            _ => None,
        }
    }

    /// Build an error from a non-success response.
    ///
    /// `status_text` is the text of the status being posted, if the request
    /// posted one; it sizes [`TwitterError::StatusTooLong`] when Twitter
    /// reports the text as too long. If that text is within `limit`, the
    /// server's message is kept instead.
    pub(crate) fn from_response(
        status: StatusCode,
        body: &[u8],
        status_text: Option<&str>,
        limit: usize,
    ) -> Self {
        let (message, error_code) = error_message(body, status);

        match status {
            StatusCode::UNAUTHORIZED => Self::NotAuthorized { message },
            StatusCode::NOT_FOUND => Self::NotFound { message },
            StatusCode::FORBIDDEN => {
                let lowered = message.to_lowercase();
                if lowered.contains("duplicate") {
                    Self::DuplicateStatus { message }
                } else if is_length_rejection(&lowered, error_code) {
                    let length = status_text.map_or(0, |t| t.chars().count());
                    Self::StatusTooLong {
                        length,
                        limit,
                        message: (length <= limit).then_some(message),
                    }
                } else {
                    Self::OperationNotPermitted { message }
                }
            }
            _ => Self::Api {
                status: status.as_u16(),
                message,
                error_code,
            },
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn too_long(length: &usize, limit: &usize, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("Status rejected as too long: {message}"),
        None => format!("Status is {length} characters, over the {limit} character limit"),
    }
}

/// Code 186, or wording like "over 140 characters" / "too long".
fn is_length_rejection(lowered: &str, error_code: Option<i32>) -> bool {
    const STATUS_OVER_LIMIT: i32 = 186;

    error_code == Some(STATUS_OVER_LIMIT)
        || lowered.contains("too long")
        || lowered
            .split_once("over ")
            .is_some_and(|(_, rest)| rest.contains("character"))
}

/// Error body shapes returned by the REST API.
///
/// Older endpoints answer `{"error": "..."}`, newer ones
/// `{"errors": [{"message": "...", "code": 187}]}`, and a few send
/// `{"errors": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<ErrorList>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorList {
    Detailed(Vec<ErrorDetail>),
    Message(String),
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i32>,
}

fn error_message(body: &[u8], status: StatusCode) -> (String, Option<i32>) {
    let fallback = || {
        let text = String::from_utf8_lossy(body).trim().to_string();
        if text.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            text
        }
    };

    let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
        return (fallback(), None);
    };

    match (parsed.errors, parsed.error) {
        (Some(ErrorList::Detailed(details)), _) if !details.is_empty() => {
            let code = details.iter().find_map(|d| d.code);
            let message = details
                .into_iter()
                .filter_map(|d| d.message)
                .collect::<Vec<_>>()
                .join("; ");
            if message.is_empty() {
                (fallback(), code)
            } else {
                (message, code)
            }
        }
        (Some(ErrorList::Message(message)), _) | (_, Some(message)) => (message, None),
        _ => (fallback(), None),
    }
}

/// Result type for Twitter operations.
pub type TwitterResult<T> = Result<T, TwitterError>;
