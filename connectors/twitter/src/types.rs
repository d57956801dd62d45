//! Twitter REST API types.
//!
//! Entities deserialize from the upstream JSON shape and serialize to a flat
//! shape of their own; the two are not meant to round-trip.

use std::fmt;
use std::io::Read;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{TwitterError, TwitterResult};

// ─────────────────────────────────────────────────────────────────────────────
// Tweet Types
// ─────────────────────────────────────────────────────────────────────────────

/// A single status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    /// Status ID
    pub id: u64,

    /// Status text
    pub text: String,

    /// Creation timestamp
    #[serde(deserialize_with = "twitter_date::deserialize")]
    pub created_at: DateTime<Utc>,

    /// Posting user
    #[serde(rename(deserialize = "user"))]
    pub author: AuthorRef,

    /// Number of times this status was retweeted
    #[serde(default, deserialize_with = "lenient_count")]
    pub retweet_count: u64,

    /// First media entity attached to the status
    #[serde(
        default,
        rename(deserialize = "entities"),
        deserialize_with = "first_media",
        skip_serializing_if = "Option::is_none"
    )]
    pub media: Option<MediaRef>,

    /// Status this one replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<u64>,

    /// User this status replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_user_id: Option<u64>,

    /// Posting application (HTML anchor)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Language code (BCP47)
    #[serde(default, rename(deserialize = "lang"), skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,

    /// Whether the authenticated user retweeted this status
    #[serde(default)]
    pub retweeted: bool,

    /// Whether the authenticated user favorited this status
    #[serde(default)]
    pub favorited: bool,
}

/// The user who posted a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    /// User ID
    pub id: u64,

    /// Screen name (handle without @)
    pub screen_name: String,

    /// Profile image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Media attached to a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Media ID
    pub id: u64,

    /// Media URL
    pub media_url: String,

    /// Media type, "photo" for uploaded images
    #[serde(rename = "type", default = "default_media_kind")]
    pub kind: String,
}

fn default_media_kind() -> String {
    "photo".into()
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile Types
// ─────────────────────────────────────────────────────────────────────────────

/// A user profile snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterProfile {
    /// User ID
    pub id: u64,

    /// Screen name (handle without @)
    pub screen_name: String,

    /// Display name
    pub name: String,

    /// Bio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Profile URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Profile image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,

    /// Account creation timestamp
    #[serde(
        default,
        deserialize_with = "twitter_date::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub followers_count: u64,

    #[serde(default)]
    pub friends_count: u64,

    #[serde(default)]
    pub statuses_count: u64,

    #[serde(default, rename(deserialize = "favourites_count"))]
    pub favorites_count: u64,

    /// Whether the account is protected (private)
    #[serde(default)]
    pub protected: bool,

    /// Whether the account is verified
    #[serde(default)]
    pub verified: bool,

    /// Interface language
    #[serde(default, rename(deserialize = "lang"), skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Status Update Types
// ─────────────────────────────────────────────────────────────────────────────

/// Optional metadata sent with a new status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDetails {
    /// Status being replied to
    pub in_reply_to_status_id: Option<u64>,

    /// Latitude of the status location
    pub latitude: Option<f64>,

    /// Longitude of the status location
    pub longitude: Option<f64>,

    /// Show a pin at the exact coordinates
    #[serde(default)]
    pub display_coordinates: bool,

    /// Wrap links with the link shortener
    #[serde(default)]
    pub wrap_links: bool,
}

impl StatusDetails {
    #[must_use]
    pub const fn in_reply_to(mut self, status_id: u64) -> Self {
        self.in_reply_to_status_id = Some(status_id);
        self
    }

    #[must_use]
    pub const fn at_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub const fn display_coordinates(mut self, display: bool) -> Self {
        self.display_coordinates = display;
        self
    }

    #[must_use]
    pub const fn wrap_links(mut self, wrap: bool) -> Self {
        self.wrap_links = wrap;
        self
    }

    /// Form parameters for the status update request.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.in_reply_to_status_id {
            params.push(("in_reply_to_status_id".to_string(), id.to_string()));
        }
        if let Some(lat) = self.latitude {
            params.push(("lat".to_string(), lat.to_string()));
        }
        if let Some(long) = self.longitude {
            params.push(("long".to_string(), long.to_string()));
        }
        if self.display_coordinates {
            params.push(("display_coordinates".to_string(), "true".to_string()));
        }
        if self.wrap_links {
            params.push(("wrap_links".to_string(), "true".to_string()));
        }
        params
    }
}

/// Declared media type of a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Gif,
    Jpeg,
    Png,
    /// Any other MIME type, lowercased
    Other(String),
}

impl MediaType {
    /// Parse a MIME type such as `image/png`.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        match mime.as_str() {
            "image/gif" => Self::Gif,
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Self::Jpeg,
            "image/png" => Self::Png,
            _ => Self::Other(mime),
        }
    }

    /// Guess from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "gif" => Some(Self::Gif),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mime(&self) -> &str {
        match self {
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Other(mime) => mime,
        }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        match self {
            Self::Gif | Self::Jpeg | Self::Png => true,
            Self::Other(mime) => mime.starts_with("image/"),
        }
    }

    /// Whether Twitter accepts this type as a status photo.
    #[must_use]
    pub const fn is_supported_photo(&self) -> bool {
        matches!(self, Self::Gif | Self::Jpeg | Self::Png)
    }

    const fn extension(&self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Other(_) => "bin",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Largest photo Twitter accepts on a status update, in bytes.
pub const MAX_PHOTO_BYTES: u64 = 3 * 1024 * 1024;

/// Photo content for a status update.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
    data: Bytes,
    media_type: MediaType,
    file_name: String,
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("len", &self.data.len())
            .field("media_type", &self.media_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl Photo {
    /// Photo from an in-memory buffer.
    pub fn new(data: impl Into<Bytes>, media_type: MediaType) -> Self {
        let file_name = format!("photo.{}", media_type.extension());
        Self {
            data: data.into(),
            media_type,
            file_name,
        }
    }

    /// Read the whole photo from `reader`, failing with `InvalidData` once it
    /// passes [`MAX_PHOTO_BYTES`].
    pub fn from_reader<R: Read>(reader: R, media_type: MediaType) -> std::io::Result<Self> {
        let mut buffer = Vec::new();
        reader.take(MAX_PHOTO_BYTES + 1).read_to_end(&mut buffer)?;
        if buffer.len() as u64 > MAX_PHOTO_BYTES {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("photo is larger than {MAX_PHOTO_BYTES} bytes"),
            ));
        }
        Ok(Self::new(buffer, media_type))
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    #[must_use]
    pub const fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Non-images are not permitted; images must be GIF, JPEG or PNG.
    pub fn validate(&self) -> TwitterResult<()> {
        if !self.media_type.is_image() {
            return Err(TwitterError::OperationNotPermitted {
                message: format!("{} is not an image", self.media_type),
            });
        }
        if !self.media_type.is_supported_photo() {
            return Err(TwitterError::UnsupportedMediaType {
                media_type: self.media_type.to_string(),
            });
        }
        Ok(())
    }
}

/// A status to post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatus {
    text: String,
    photo: Option<Photo>,
    details: Option<StatusDetails>,
}

impl NewStatus {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            photo: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photo = Some(photo);
        self
    }

    #[must_use]
    pub const fn with_details(mut self, details: StatusDetails) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    #[must_use]
    pub const fn details(&self) -> Option<&StatusDetails> {
        self.details.as_ref()
    }

    /// Check text length (in characters) and the photo before sending.
    pub fn validate(&self, max_length: usize) -> TwitterResult<()> {
        if self.text.trim().is_empty() {
            return Err(TwitterError::EmptyStatus);
        }
        let length = self.text.chars().count();
        if length > max_length {
            return Err(TwitterError::StatusTooLong {
                length,
                limit: max_length,
                message: None,
            });
        }
        if let Some(photo) = &self.photo {
            photo.validate()?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Timestamps such as `Wed Aug 27 13:08:45 +0000 2008`; RFC 3339 is also accepted.
mod twitter_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(value, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(value))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {value}")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|value| {
                parse(&value).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {value}")))
            })
            .transpose()
    }
}

/// Counts arrive as numbers, or as strings like `"100+"` once they saturate.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Number(n)) => n,
        Some(Count::Text(text)) => text
            .trim_end_matches('+')
            .trim()
            .parse()
            .map_err(<D::Error as serde::de::Error>::custom)?,
        None => 0,
    })
}

fn first_media<'de, D>(deserializer: D) -> Result<Option<MediaRef>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Entities {
        #[serde(default)]
        media: Vec<MediaRef>,
    }

    Ok(Option::<Entities>::deserialize(deserializer)?
        .and_then(|entities| entities.media.into_iter().next()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn wire_status() -> serde_json::Value {
        json!({
            "id": 12345,
            "id_str": "12345",
            "text": "Tweet 1",
            "created_at": "Wed Aug 27 13:08:45 +0000 2008",
            "source": "<a href=\"http://twitter.com\">web</a>",
            "in_reply_to_status_id": 123_123_123,
            "in_reply_to_user_id": null,
            "retweet_count": 12,
            "favorited": true,
            "user": {
                "id": 112_233,
                "screen_name": "habuma",
                "name": "Craig Walls",
                "profile_image_url": "http://a3.twimg.com/profile_images/1205746571/me2_300.jpg"
            },
            "entities": {
                "hashtags": [],
                "media": [{
                    "id": 777,
                    "media_url": "http://p.twimg.com/photo.png",
                    "type": "photo"
                }]
            }
        })
    }

    #[test]
    fn test_tweet_from_wire_shape() {
        let tweet: Tweet = serde_json::from_value(wire_status()).unwrap();

        assert_eq!(tweet.id, 12345);
        assert_eq!(tweet.text, "Tweet 1");
        assert_eq!(
            tweet.created_at,
            Utc.with_ymd_and_hms(2008, 8, 27, 13, 8, 45).unwrap()
        );
        assert_eq!(tweet.author.id, 112_233);
        assert_eq!(tweet.author.screen_name, "habuma");
        assert_eq!(tweet.retweet_count, 12);
        assert_eq!(tweet.in_reply_to_status_id, Some(123_123_123));
        assert_eq!(tweet.in_reply_to_user_id, None);
        assert!(tweet.favorited);
        assert!(!tweet.retweeted);
        assert_eq!(tweet.media.as_ref().map(|m| m.id), Some(777));
    }

    #[test]
    fn test_retweet_count_saturated_string() {
        let mut value = wire_status();
        value["retweet_count"] = json!("100+");
        let tweet: Tweet = serde_json::from_value(value).unwrap();
        assert_eq!(tweet.retweet_count, 100);
    }

    #[test]
    fn test_tweet_without_entities_has_no_media() {
        let mut value = wire_status();
        value.as_object_mut().unwrap().remove("entities");
        value.as_object_mut().unwrap().remove("retweet_count");
        let tweet: Tweet = serde_json::from_value(value).unwrap();
        assert!(tweet.media.is_none());
        assert_eq!(tweet.retweet_count, 0);
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let mut value = wire_status();
        value["created_at"] = json!("yesterday");
        assert!(serde_json::from_value::<Tweet>(value).is_err());
    }

    #[test]
    fn test_profile_from_wire_shape() {
        let profile: TwitterProfile = serde_json::from_value(json!({
            "id": 161_064_614,
            "screen_name": "artnames",
            "name": "Art Names",
            "description": "I'm just a normal kinda guy",
            "created_at": "Tue Jul 27 23:52:29 +0000 2010",
            "followers_count": 10,
            "friends_count": 4,
            "favourites_count": 7,
            "statuses_count": 99,
            "protected": false,
            "lang": "en"
        }))
        .unwrap();

        assert_eq!(profile.id, 161_064_614);
        assert_eq!(profile.favorites_count, 7);
        assert_eq!(profile.language.as_deref(), Some("en"));
        assert!(profile.created_at.is_some());
        assert!(profile.url.is_none());
    }

    #[test]
    fn test_status_details_params() {
        let details = StatusDetails::default()
            .in_reply_to(99)
            .at_location(47.5, -122.25)
            .wrap_links(true);
        let params = details.to_params();

        assert!(params.contains(&("in_reply_to_status_id".into(), "99".into())));
        assert!(params.contains(&("lat".into(), "47.5".into())));
        assert!(params.contains(&("long".into(), "-122.25".into())));
        assert!(params.contains(&("wrap_links".into(), "true".into())));
        assert!(!params.iter().any(|(k, _)| k == "display_coordinates"));
        assert!(StatusDetails::default().to_params().is_empty());
    }

    #[test]
    fn test_media_type_parsing() {
        assert_eq!(MediaType::from_mime("IMAGE/PNG"), MediaType::Png);
        assert_eq!(MediaType::from_mime("image/jpg"), MediaType::Jpeg);
        assert_eq!(MediaType::from_extension("GIF"), Some(MediaType::Gif));
        assert_eq!(MediaType::from_extension("pdf"), None);
        assert!(MediaType::from_mime("image/webp").is_image());
        assert!(!MediaType::from_mime("image/webp").is_supported_photo());
        assert!(!MediaType::from_mime("application/pdf").is_image());
    }

    #[test]
    fn test_photo_validation() {
        let pdf = Photo::new(b"%PDF-1.4".to_vec(), MediaType::from_mime("application/pdf"));
        assert!(matches!(
            pdf.validate(),
            Err(TwitterError::OperationNotPermitted { .. })
        ));

        let webp = Photo::new(b"RIFF".to_vec(), MediaType::from_mime("image/webp"));
        assert!(matches!(
            webp.validate(),
            Err(TwitterError::UnsupportedMediaType { .. })
        ));

        let png = Photo::from_reader(&b"\x89PNG\r\n"[..], MediaType::Png).unwrap();
        assert!(png.validate().is_ok());
        assert_eq!(png.file_name(), "photo.png");
        assert_eq!(png.data().len(), 6);
    }

    #[test]
    fn test_photo_reader_is_capped() {
        let limit = usize::try_from(MAX_PHOTO_BYTES).unwrap();

        let at_limit = Photo::from_reader(std::io::repeat(0).take(MAX_PHOTO_BYTES), MediaType::Gif)
            .unwrap();
        assert_eq!(at_limit.data().len(), limit);

        let err = Photo::from_reader(std::io::repeat(0), MediaType::Gif).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_new_status_length_counts_characters() {
        let limit = 140;
        let exactly = NewStatus::new("\u{e9}".repeat(140));
        assert!(exactly.validate(limit).is_ok());

        let over = NewStatus::new("a".repeat(141));
        assert!(matches!(
            over.validate(limit),
            Err(TwitterError::StatusTooLong {
                length: 141,
                limit: 140,
                message: None
            })
        ));

        assert!(matches!(
            NewStatus::new("   ").validate(limit),
            Err(TwitterError::EmptyStatus)
        ));
    }
}
