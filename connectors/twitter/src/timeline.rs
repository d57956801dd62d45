//! Timeline, status, retweet and favorite operations.
//!
//! Each logical operation is one method taking [`Paging`], [`UserRef`] or
//! [`NewStatus`] values; absent optional fields are simply not sent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::{
    client::TwitterApiClient,
    config::TwitterConfig,
    error::TwitterResult,
    request::{ApiRequest, Endpoint, Paging, UserRef},
    types::{NewStatus, Tweet, TwitterProfile},
};

/// Operations on timelines and statuses.
///
/// List results are ordered newest first. Operations that act on behalf of a
/// user fail with an authorization error, before any request is made, when
/// the client has no credentials.
#[async_trait]
pub trait TimelineOperations: Send + Sync {
    /// The 20 most recent statuses from non-protected users.
    async fn public_timeline(&self) -> TwitterResult<Vec<Tweet>>;

    /// Statuses and retweets from the authenticated user and their friends.
    async fn home_timeline(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>>;

    /// Statuses posted by `user`, or by the authenticated user when `None`.
    async fn user_timeline(
        &self,
        user: Option<&UserRef>,
        paging: &Paging,
    ) -> TwitterResult<Vec<Tweet>>;

    /// Statuses mentioning the authenticated user.
    async fn mentions(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>>;

    /// Retweets posted by the authenticated user.
    async fn retweeted_by_me(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>>;

    /// Retweets posted by `user`.
    async fn retweeted_by_user(&self, user: &UserRef, paging: &Paging)
    -> TwitterResult<Vec<Tweet>>;

    /// Retweets posted by the authenticated user's friends.
    async fn retweeted_to_me(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>>;

    /// Retweets posted by the friends of `user`.
    async fn retweeted_to_user(&self, user: &UserRef, paging: &Paging)
    -> TwitterResult<Vec<Tweet>>;

    /// The authenticated user's statuses that others retweeted.
    async fn retweets_of_me(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>>;

    /// A single status.
    async fn status(&self, status_id: u64) -> TwitterResult<Tweet>;

    /// Post a status, optionally with a photo and metadata.
    async fn update_status(&self, status: &NewStatus) -> TwitterResult<Tweet>;

    async fn delete_status(&self, status_id: u64) -> TwitterResult<()>;

    async fn retweet(&self, status_id: u64) -> TwitterResult<()>;

    /// Retweets of a status, up to `count` entries.
    async fn retweets(&self, status_id: u64, count: Option<u32>) -> TwitterResult<Vec<Tweet>>;

    /// Profiles of users who retweeted a status.
    async fn retweeted_by(
        &self,
        status_id: u64,
        paging: &Paging,
    ) -> TwitterResult<Vec<TwitterProfile>>;

    /// Ids of users who retweeted a status.
    async fn retweeted_by_ids(&self, status_id: u64, paging: &Paging) -> TwitterResult<Vec<u64>>;

    /// The authenticated user's favorite statuses.
    async fn favorites(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>>;

    async fn add_to_favorites(&self, status_id: u64) -> TwitterResult<()>;

    async fn remove_from_favorites(&self, status_id: u64) -> TwitterResult<()>;
}

/// [`TimelineOperations`] over the REST API.
#[derive(Debug, Clone)]
pub struct TimelineClient {
    api: Arc<TwitterApiClient>,
}

impl TimelineClient {
    /// Create a client from configuration.
    pub fn new(config: &TwitterConfig) -> TwitterResult<Self> {
        Ok(Self::from_api(Arc::new(TwitterApiClient::new(config)?)))
    }

    /// Wrap an existing API client.
    #[must_use]
    pub const fn from_api(api: Arc<TwitterApiClient>) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn api(&self) -> &TwitterApiClient {
        &self.api
    }

    async fn timeline(&self, endpoint: Endpoint, paging: &Paging) -> TwitterResult<Vec<Tweet>> {
        let request = ApiRequest::new(endpoint).paging(paging);
        self.api.fetch_timeline(&request).await
    }

    async fn user_scoped(
        &self,
        endpoint: Endpoint,
        user: &UserRef,
        paging: &Paging,
    ) -> TwitterResult<Vec<Tweet>> {
        let request = ApiRequest::new(endpoint).user(user).paging(paging);
        self.api.fetch_timeline(&request).await
    }

    /// Authorization is checked before the status content.
    fn status_request(&self, status: &NewStatus) -> TwitterResult<ApiRequest> {
        let endpoint = if status.photo().is_some() {
            Endpoint::UpdateStatusWithMedia
        } else {
            Endpoint::UpdateStatus
        };

        let mut request = ApiRequest::new(endpoint).form_param("status", status.text());
        self.api.ensure_authorized(&request)?;
        status.validate(self.api.max_status_length())?;

        if let Some(details) = status.details() {
            request = request.form_params(details.to_params());
        }
        if let Some(photo) = status.photo() {
            request = request.attachment(photo.clone());
        }
        Ok(request)
    }
}

#[async_trait]
impl TimelineOperations for TimelineClient {
    #[instrument(skip(self))]
    async fn public_timeline(&self) -> TwitterResult<Vec<Tweet>> {
        self.timeline(Endpoint::PublicTimeline, &Paging::new()).await
    }

    #[instrument(skip(self))]
    async fn home_timeline(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>> {
        self.timeline(Endpoint::HomeTimeline, paging).await
    }

    #[instrument(skip(self))]
    async fn user_timeline(
        &self,
        user: Option<&UserRef>,
        paging: &Paging,
    ) -> TwitterResult<Vec<Tweet>> {
        match user {
            Some(user) => self.user_scoped(Endpoint::UserTimeline, user, paging).await,
            None => self.timeline(Endpoint::OwnTimeline, paging).await,
        }
    }

    #[instrument(skip(self))]
    async fn mentions(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>> {
        self.timeline(Endpoint::Mentions, paging).await
    }

    #[instrument(skip(self))]
    async fn retweeted_by_me(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>> {
        self.timeline(Endpoint::RetweetedByMe, paging).await
    }

    #[instrument(skip(self))]
    async fn retweeted_by_user(
        &self,
        user: &UserRef,
        paging: &Paging,
    ) -> TwitterResult<Vec<Tweet>> {
        self.user_scoped(Endpoint::RetweetedByUser, user, paging).await
    }

    #[instrument(skip(self))]
    async fn retweeted_to_me(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>> {
        self.timeline(Endpoint::RetweetedToMe, paging).await
    }

    #[instrument(skip(self))]
    async fn retweeted_to_user(
        &self,
        user: &UserRef,
        paging: &Paging,
    ) -> TwitterResult<Vec<Tweet>> {
        self.user_scoped(Endpoint::RetweetedToUser, user, paging).await
    }

    #[instrument(skip(self))]
    async fn retweets_of_me(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>> {
        self.timeline(Endpoint::RetweetsOfMe, paging).await
    }

    #[instrument(skip(self))]
    async fn status(&self, status_id: u64) -> TwitterResult<Tweet> {
        self.api
            .fetch_one(&ApiRequest::new(Endpoint::ShowStatus(status_id)))
            .await
    }

    #[instrument(skip(self, status), fields(chars = status.text().chars().count()))]
    async fn update_status(&self, status: &NewStatus) -> TwitterResult<Tweet> {
        let request = self.status_request(status)?;
        let tweet: Tweet = self.api.fetch_one(&request).await?;
        info!(tweet_id = tweet.id, "Posted status");
        Ok(tweet)
    }

    #[instrument(skip(self))]
    async fn delete_status(&self, status_id: u64) -> TwitterResult<()> {
        self.api
            .execute(&ApiRequest::new(Endpoint::DestroyStatus(status_id)))
            .await
    }

    #[instrument(skip(self))]
    async fn retweet(&self, status_id: u64) -> TwitterResult<()> {
        self.api
            .execute(&ApiRequest::new(Endpoint::Retweet(status_id)))
            .await
    }

    #[instrument(skip(self))]
    async fn retweets(&self, status_id: u64, count: Option<u32>) -> TwitterResult<Vec<Tweet>> {
        let paging = Paging {
            count,
            ..Paging::new()
        };
        self.timeline(Endpoint::Retweets(status_id), &paging).await
    }

    #[instrument(skip(self))]
    async fn retweeted_by(
        &self,
        status_id: u64,
        paging: &Paging,
    ) -> TwitterResult<Vec<TwitterProfile>> {
        let request = ApiRequest::new(Endpoint::RetweetedBy(status_id)).paging(paging);
        self.api.fetch_list(&request).await
    }

    #[instrument(skip(self))]
    async fn retweeted_by_ids(&self, status_id: u64, paging: &Paging) -> TwitterResult<Vec<u64>> {
        let request = ApiRequest::new(Endpoint::RetweetedByIds(status_id)).paging(paging);
        self.api.fetch_ids(&request).await
    }

    #[instrument(skip(self))]
    async fn favorites(&self, paging: &Paging) -> TwitterResult<Vec<Tweet>> {
        self.timeline(Endpoint::Favorites, paging).await
    }

    #[instrument(skip(self))]
    async fn add_to_favorites(&self, status_id: u64) -> TwitterResult<()> {
        self.api
            .execute(&ApiRequest::new(Endpoint::CreateFavorite(status_id)))
            .await
    }

    #[instrument(skip(self))]
    async fn remove_from_favorites(&self, status_id: u64) -> TwitterResult<()> {
        self.api
            .execute(&ApiRequest::new(Endpoint::DestroyFavorite(status_id)))
            .await
    }
}
