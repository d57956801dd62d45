//! JSON bodies in the shape the v1 REST API returns them.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

/// Upstream `created_at` layout.
pub const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S +0000 %Y";

/// Id of the user every fixture status is posted by.
pub const AUTHOR_ID: u64 = 14_253_710;

/// Screen name of the fixture author.
pub const AUTHOR_SCREEN_NAME: &str = "habuma";

// ─────────────────────────────────────────────────────────────────────────────
// Time
// ─────────────────────────────────────────────────────────────────────────────

/// Reference instant fixtures are dated from: 2012-03-01 12:00:00 UTC.
///
/// # Panics
///
/// Never; the timestamp is in range.
#[must_use]
pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_330_603_200, 0).expect("fixture timestamp in range")
}

/// `base_time()` shifted by `minutes`, in upstream format.
#[must_use]
pub fn twitter_date(minutes: i64) -> String {
    (base_time() + Duration::minutes(minutes))
        .format(TWITTER_DATE_FORMAT)
        .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Statuses
// ─────────────────────────────────────────────────────────────────────────────

/// A status posted `minutes` after [`base_time`].
#[must_use]
pub fn status(id: u64, text: &str, minutes: i64) -> Value {
    json!({
        "id": id,
        "id_str": id.to_string(),
        "text": text,
        "created_at": twitter_date(minutes),
        "source": "<a href=\"http://www.springsource.org/spring-social\" rel=\"nofollow\">Spring Social</a>",
        "in_reply_to_status_id": null,
        "in_reply_to_user_id": null,
        "retweet_count": 0,
        "retweeted": false,
        "favorited": false,
        "lang": "en",
        "user": author(),
    })
}

/// A status with one attached photo.
#[must_use]
pub fn status_with_media(id: u64, text: &str, media_id: u64) -> Value {
    let mut value = status(id, text, 0);
    value["entities"] = json!({
        "hashtags": [],
        "urls": [],
        "media": [{
            "id": media_id,
            "media_url": format!("http://p.twimg.com/{media_id}.png"),
            "media_url_https": format!("https://p.twimg.com/{media_id}.png"),
            "type": "photo"
        }]
    });
    value
}

/// A timeline of statuses; each `(id, minutes)` pair becomes one entry, in
/// the order given.
#[must_use]
pub fn timeline(entries: &[(u64, i64)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(id, minutes)| status(*id, &format!("Status {id}"), *minutes))
            .collect(),
    )
}

fn author() -> Value {
    json!({
        "id": AUTHOR_ID,
        "screen_name": AUTHOR_SCREEN_NAME,
        "profile_image_url": "http://a0.twimg.com/profile_images/habuma.jpg"
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Profiles and ids
// ─────────────────────────────────────────────────────────────────────────────

/// A user profile.
#[must_use]
pub fn profile(id: u64, screen_name: &str) -> Value {
    json!({
        "id": id,
        "screen_name": screen_name,
        "name": format!("User {screen_name}"),
        "description": "Test account",
        "location": "Plano, TX",
        "url": null,
        "profile_image_url": format!("http://a0.twimg.com/profile_images/{screen_name}.jpg"),
        "created_at": twitter_date(-60 * 24 * 365),
        "followers_count": 1200,
        "friends_count": 300,
        "statuses_count": 4500,
        "favourites_count": 12,
        "protected": false,
        "verified": false,
        "lang": "en"
    })
}

/// A cursored id list.
#[must_use]
pub fn cursored_ids(ids: &[u64]) -> Value {
    json!({
        "ids": ids,
        "next_cursor": 0,
        "previous_cursor": 0
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// `{"errors": [{"message", "code"}]}`
#[must_use]
pub fn error_body(message: &str, code: i32) -> Value {
    json!({ "errors": [{ "message": message, "code": code }] })
}

/// `{"error": message, "request": ...}`
#[must_use]
pub fn legacy_error_body(message: &str) -> Value {
    json!({ "error": message, "request": "/1/statuses/update.json" })
}
