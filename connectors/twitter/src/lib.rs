//! Twitter timeline client
//!
//! An async client for the Twitter REST API status family: timelines,
//! single statuses, posting, retweets and favorites.
//!
//! ## Operations
//!
//! ### Anonymous
//! - Public timeline, another user's timeline
//! - Single status, retweets of a status, profiles of retweeters
//!
//! ### User context (OAuth 1.0a credentials required)
//! - Home timeline, own timeline, mentions
//! - Retweeted-by/to timelines, retweets of me, retweeter ids
//! - Post (text or photo), delete, retweet
//! - Favorites list, favorite, unfavorite
//!
//! ```no_run
//! use twitter_timeline::{Paging, TimelineClient, TimelineOperations, TwitterConfig};
//!
//! # async fn run() -> twitter_timeline::TwitterResult<()> {
//! let client = TimelineClient::new(&TwitterConfig::anonymous())?;
//! let tweets = client.user_timeline(Some(&"habuma".into()), &Paging::pages(1, 50)).await?;
//! for tweet in tweets {
//!     println!("{} {}", tweet.created_at, tweet.text);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod config;
pub mod decode;
mod error;
mod oauth;
mod request;
mod timeline;
mod types;

pub use client::TwitterApiClient;
pub use config::{Credentials, TwitterConfig};
pub use error::{ErrorKind, TwitterError, TwitterResult};
pub use oauth::{Authorizer, OAuthSigner};
pub use request::{ApiRequest, Endpoint, Host, Paging, UserRef};
pub use timeline::{TimelineClient, TimelineOperations};
pub use types::{
    AuthorRef, MAX_PHOTO_BYTES, MediaRef, MediaType, NewStatus, Photo, StatusDetails, Tweet,
    TwitterProfile,
};
