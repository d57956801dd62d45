//! Subcommands, one per timeline operation.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use twitter_timeline::{
    MediaType, NewStatus, Paging, Photo, StatusDetails, TimelineOperations, UserRef,
};

/// Paging flags shared by the list commands.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PagingArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Entries per page; Twitter caps this per endpoint
    #[arg(long)]
    pub count: Option<u32>,

    /// Only entries newer than this status id
    #[arg(long)]
    pub since_id: Option<u64>,

    /// Only entries at or older than this status id
    #[arg(long)]
    pub max_id: Option<u64>,
}

impl From<PagingArgs> for Paging {
    fn from(args: PagingArgs) -> Self {
        Self {
            page: args.page,
            count: args.count,
            since_id: args.since_id,
            max_id: args.max_id,
        }
    }
}

/// A user, by id or screen name.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct UserArgs {
    #[arg(long)]
    pub user_id: Option<u64>,

    #[arg(long)]
    pub screen_name: Option<String>,
}

/// Same as [`UserArgs`], but may be left out.
#[derive(Args, Debug, Clone)]
#[group(required = false, multiple = false)]
pub struct OptionalUserArgs {
    /// Numeric user id; defaults to the authenticated user
    #[arg(long)]
    pub user_id: Option<u64>,

    /// Screen name; defaults to the authenticated user
    #[arg(long)]
    pub screen_name: Option<String>,
}

fn user_ref(user_id: Option<u64>, screen_name: Option<&str>) -> Option<UserRef> {
    user_id
        .map(UserRef::Id)
        .or_else(|| screen_name.map(UserRef::screen_name))
}

impl UserArgs {
    fn user(&self) -> Result<UserRef> {
        user_ref(self.user_id, self.screen_name.as_deref())
            .context("either --user-id or --screen-name is required")
    }
}

/// Arguments for `timeline post`.
#[derive(Args, Debug, Clone)]
pub struct PostArgs {
    /// Status text
    pub text: String,

    /// Photo to attach
    #[arg(long)]
    pub photo: Option<PathBuf>,

    /// MIME type of the photo; guessed from its extension when omitted
    #[arg(long, requires = "photo")]
    pub media_type: Option<String>,

    /// Status this one replies to
    #[arg(long)]
    pub reply_to: Option<u64>,

    #[arg(long, requires = "long", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub long: Option<f64>,

    /// Show a pin at the exact coordinates
    #[arg(long)]
    pub display_coordinates: bool,

    /// Wrap links with the link shortener
    #[arg(long)]
    pub wrap_links: bool,
}

impl PostArgs {
    fn new_status(&self) -> Result<NewStatus> {
        let mut details = StatusDetails::default()
            .display_coordinates(self.display_coordinates)
            .wrap_links(self.wrap_links);
        if let Some(id) = self.reply_to {
            details = details.in_reply_to(id);
        }
        if let (Some(lat), Some(long)) = (self.lat, self.long) {
            details = details.at_location(lat, long);
        }

        let mut status = NewStatus::new(self.text.clone()).with_details(details);
        if let Some(path) = &self.photo {
            status = status.with_photo(read_photo(path, self.media_type.as_deref())?);
        }
        Ok(status)
    }
}

fn read_photo(path: &Path, media_type: Option<&str>) -> Result<Photo> {
    let media_type = match media_type {
        Some(mime) => MediaType::from_mime(mime),
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .with_context(|| {
                format!(
                    "cannot tell the media type of {}; pass --media-type",
                    path.display()
                )
            })?,
    };

    let file =
        File::open(path).with_context(|| format!("failed to open photo {}", path.display()))?;
    let mut photo = Photo::from_reader(file, media_type)
        .with_context(|| format!("failed to read photo {}", path.display()))?;
    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        photo = photo.with_file_name(name);
    }
    Ok(photo)
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// The 20 most recent public statuses
    Public,

    /// The authenticated user's home timeline
    Home(PagingArgs),

    /// Statuses posted by a user, or by the authenticated user
    User {
        #[command(flatten)]
        user: OptionalUserArgs,
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Statuses mentioning the authenticated user
    Mentions(PagingArgs),

    /// Retweets posted by the authenticated user
    RetweetedByMe(PagingArgs),

    /// Retweets posted by a user
    RetweetedByUser {
        #[command(flatten)]
        user: UserArgs,
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Retweets posted by the authenticated user's friends
    RetweetedToMe(PagingArgs),

    /// Retweets posted by a user's friends
    RetweetedToUser {
        #[command(flatten)]
        user: UserArgs,
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// The authenticated user's statuses that others retweeted
    RetweetsOfMe(PagingArgs),

    /// A single status
    Show { id: u64 },

    /// Post a status
    Post(PostArgs),

    /// Delete a status
    Delete { id: u64 },

    /// Retweet a status
    Retweet { id: u64 },

    /// Retweets of a status
    Retweets {
        id: u64,
        #[arg(long)]
        count: Option<u32>,
    },

    /// Profiles of users who retweeted a status
    RetweetedBy {
        id: u64,
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Ids of users who retweeted a status
    RetweetedByIds {
        id: u64,
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// The authenticated user's favorites
    Favorites(PagingArgs),

    /// Favorite a status
    Favorite { id: u64 },

    /// Remove a status from favorites
    Unfavorite { id: u64 },
}

/// Result of an operation that returns nothing.
#[derive(Debug, Serialize)]
struct Done {
    operation: &'static str,
    id: u64,
}

impl Command {
    /// Run against `client` and return the JSON to print.
    pub async fn run(self, client: &dyn TimelineOperations) -> Result<Value> {
        match self {
            Self::Public => to_json(client.public_timeline().await?),
            Self::Home(paging) => to_json(client.home_timeline(&paging.into()).await?),
            Self::User { user, paging } => {
                let user = user_ref(user.user_id, user.screen_name.as_deref());
                to_json(client.user_timeline(user.as_ref(), &paging.into()).await?)
            }
            Self::Mentions(paging) => to_json(client.mentions(&paging.into()).await?),
            Self::RetweetedByMe(paging) => to_json(client.retweeted_by_me(&paging.into()).await?),
            Self::RetweetedByUser { user, paging } => {
                to_json(client.retweeted_by_user(&user.user()?, &paging.into()).await?)
            }
            Self::RetweetedToMe(paging) => to_json(client.retweeted_to_me(&paging.into()).await?),
            Self::RetweetedToUser { user, paging } => {
                to_json(client.retweeted_to_user(&user.user()?, &paging.into()).await?)
            }
            Self::RetweetsOfMe(paging) => to_json(client.retweets_of_me(&paging.into()).await?),
            Self::Show { id } => to_json(client.status(id).await?),
            Self::Post(args) => {
                let status = args.new_status()?;
                to_json(client.update_status(&status).await?)
            }
            Self::Delete { id } => {
                client.delete_status(id).await?;
                done("delete", id)
            }
            Self::Retweet { id } => {
                client.retweet(id).await?;
                done("retweet", id)
            }
            Self::Retweets { id, count } => to_json(client.retweets(id, count).await?),
            Self::RetweetedBy { id, paging } => {
                to_json(client.retweeted_by(id, &paging.into()).await?)
            }
            Self::RetweetedByIds { id, paging } => {
                to_json(client.retweeted_by_ids(id, &paging.into()).await?)
            }
            Self::Favorites(paging) => to_json(client.favorites(&paging.into()).await?),
            Self::Favorite { id } => {
                client.add_to_favorites(id).await?;
                done("favorite", id)
            }
            Self::Unfavorite { id } => {
                client.remove_from_favorites(id).await?;
                done("unfavorite", id)
            }
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn done(operation: &'static str, id: u64) -> Result<Value> {
    to_json(Done { operation, id })
}
