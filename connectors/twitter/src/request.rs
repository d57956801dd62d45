//! Endpoint catalog and request descriptors.
//!
//! Every operation resolves to an [`ApiRequest`]: an [`Endpoint`] plus the
//! query and form parameters built from [`Paging`], [`UserRef`] and status
//! metadata. Page sizes are passed through as given; Twitter caps them.

use reqwest::Method;

use crate::types::Photo;

/// Which base URL an endpoint lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// `TwitterConfig::api_url`
    Api,
    /// `TwitterConfig::upload_url`
    Upload,
}

/// A REST endpoint, with the status id for the endpoints that take one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    PublicTimeline,
    HomeTimeline,
    /// The authenticated user's own tweets
    OwnTimeline,
    /// Tweets of the user named by a [`UserRef`]
    UserTimeline,
    Mentions,
    RetweetedByMe,
    RetweetedByUser,
    RetweetedToMe,
    RetweetedToUser,
    RetweetsOfMe,
    ShowStatus(u64),
    UpdateStatus,
    UpdateStatusWithMedia,
    DestroyStatus(u64),
    Retweet(u64),
    Retweets(u64),
    RetweetedBy(u64),
    RetweetedByIds(u64),
    Favorites,
    CreateFavorite(u64),
    DestroyFavorite(u64),
}

impl Endpoint {
    /// Operation name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PublicTimeline => "public_timeline",
            Self::HomeTimeline => "home_timeline",
            Self::OwnTimeline | Self::UserTimeline => "user_timeline",
            Self::Mentions => "mentions",
            Self::RetweetedByMe => "retweeted_by_me",
            Self::RetweetedByUser => "retweeted_by_user",
            Self::RetweetedToMe => "retweeted_to_me",
            Self::RetweetedToUser => "retweeted_to_user",
            Self::RetweetsOfMe => "retweets_of_me",
            Self::ShowStatus(_) => "status",
            Self::UpdateStatus | Self::UpdateStatusWithMedia => "update_status",
            Self::DestroyStatus(_) => "delete_status",
            Self::Retweet(_) => "retweet",
            Self::Retweets(_) => "retweets",
            Self::RetweetedBy(_) => "retweeted_by",
            Self::RetweetedByIds(_) => "retweeted_by_ids",
            Self::Favorites => "favorites",
            Self::CreateFavorite(_) => "add_to_favorites",
            Self::DestroyFavorite(_) => "remove_from_favorites",
        }
    }

    /// Path relative to the host base URL.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::PublicTimeline => "statuses/public_timeline.json".into(),
            Self::HomeTimeline => "statuses/home_timeline.json".into(),
            Self::OwnTimeline | Self::UserTimeline => "statuses/user_timeline.json".into(),
            Self::Mentions => "statuses/mentions.json".into(),
            Self::RetweetedByMe => "statuses/retweeted_by_me.json".into(),
            Self::RetweetedByUser => "statuses/retweeted_by_user.json".into(),
            Self::RetweetedToMe => "statuses/retweeted_to_me.json".into(),
            Self::RetweetedToUser => "statuses/retweeted_to_user.json".into(),
            Self::RetweetsOfMe => "statuses/retweets_of_me.json".into(),
            Self::ShowStatus(id) => format!("statuses/show/{id}.json"),
            Self::UpdateStatus => "statuses/update.json".into(),
            Self::UpdateStatusWithMedia => "statuses/update_with_media.json".into(),
            Self::DestroyStatus(id) => format!("statuses/destroy/{id}.json"),
            Self::Retweet(id) => format!("statuses/retweet/{id}.json"),
            Self::Retweets(id) => format!("statuses/retweets/{id}.json"),
            Self::RetweetedBy(id) => format!("statuses/{id}/retweeted_by.json"),
            Self::RetweetedByIds(id) => format!("statuses/{id}/retweeted_by/ids.json"),
            Self::Favorites => "favorites.json".into(),
            Self::CreateFavorite(id) => format!("favorites/create/{id}.json"),
            Self::DestroyFavorite(id) => format!("favorites/destroy/{id}.json"),
        }
    }

    /// HTTP method.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::UpdateStatus
            | Self::UpdateStatusWithMedia
            | Self::DestroyStatus(_)
            | Self::Retweet(_)
            | Self::CreateFavorite(_)
            | Self::DestroyFavorite(_) => Method::POST,
            _ => Method::GET,
        }
    }

    #[must_use]
    pub const fn host(self) -> Host {
        match self {
            Self::UpdateStatusWithMedia => Host::Upload,
            _ => Host::Api,
        }
    }

    /// Whether the request must carry user credentials.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        !matches!(
            self,
            Self::PublicTimeline
                | Self::UserTimeline
                | Self::ShowStatus(_)
                | Self::Retweets(_)
                | Self::RetweetedBy(_)
        )
    }

    /// Largest page Twitter will return; larger counts are capped upstream.
    #[must_use]
    pub const fn page_size_ceiling(self) -> Option<u32> {
        match self {
            Self::HomeTimeline | Self::OwnTimeline | Self::UserTimeline | Self::Mentions => {
                Some(200)
            }
            Self::RetweetedByMe
            | Self::RetweetedByUser
            | Self::RetweetedToMe
            | Self::RetweetedToUser
            | Self::RetweetsOfMe
            | Self::Retweets(_)
            | Self::RetweetedBy(_)
            | Self::RetweetedByIds(_) => Some(100),
            _ => None,
        }
    }

    /// Whether `page` is accepted.
    #[must_use]
    pub const fn accepts_page(self) -> bool {
        self.is_paged_timeline()
            || matches!(
                self,
                Self::RetweetedBy(_) | Self::RetweetedByIds(_) | Self::Favorites
            )
    }

    /// Whether `count` is accepted.
    #[must_use]
    pub const fn accepts_count(self) -> bool {
        self.accepts_page() || matches!(self, Self::Retweets(_))
    }

    /// Whether `since_id` / `max_id` are accepted.
    #[must_use]
    pub const fn accepts_id_range(self) -> bool {
        self.is_paged_timeline()
    }

    const fn is_paged_timeline(self) -> bool {
        matches!(
            self,
            Self::HomeTimeline
                | Self::OwnTimeline
                | Self::UserTimeline
                | Self::Mentions
                | Self::RetweetedByMe
                | Self::RetweetedByUser
                | Self::RetweetedToMe
                | Self::RetweetedToUser
                | Self::RetweetsOfMe
        )
    }
}

/// Pagination and id-range parameters. Absent fields are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    /// 1-based page number
    pub page: Option<u32>,
    /// Entries per page
    pub count: Option<u32>,
    /// Only return entries with an id greater than this
    pub since_id: Option<u64>,
    /// Only return entries with an id less than or equal to this
    pub max_id: Option<u64>,
}

impl Paging {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page: None,
            count: None,
            since_id: None,
            max_id: None,
        }
    }

    /// Page number and size.
    #[must_use]
    pub const fn pages(page: u32, count: u32) -> Self {
        Self {
            page: Some(page),
            count: Some(count),
            since_id: None,
            max_id: None,
        }
    }

    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub const fn with_since_id(mut self, since_id: u64) -> Self {
        self.since_id = Some(since_id);
        self
    }

    #[must_use]
    pub const fn with_max_id(mut self, max_id: u64) -> Self {
        self.max_id = Some(max_id);
        self
    }
}

/// A user, by numeric id or screen name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(u64),
    ScreenName(String),
}

impl UserRef {
    pub fn screen_name(name: impl Into<String>) -> Self {
        Self::ScreenName(name.into())
    }

    /// The query parameter identifying this user.
    #[must_use]
    pub fn query_param(&self) -> (String, String) {
        match self {
            Self::Id(id) => ("user_id".to_string(), id.to_string()),
            Self::ScreenName(name) => (
                "screen_name".to_string(),
                name.trim_start_matches('@').to_string(),
            ),
        }
    }
}

impl From<u64> for UserRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for UserRef {
    fn from(name: &str) -> Self {
        Self::screen_name(name)
    }
}

impl From<String> for UserRef {
    fn from(name: String) -> Self {
        Self::ScreenName(name)
    }
}

/// A fully parameterized request, ready to be signed and sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    endpoint: Endpoint,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    attachment: Option<Photo>,
}

impl ApiRequest {
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            form: Vec::new(),
            attachment: None,
        }
    }

    /// Apply the paging fields this endpoint accepts.
    #[must_use]
    pub fn paging(mut self, paging: &Paging) -> Self {
        let endpoint = self.endpoint;
        if endpoint.accepts_page() {
            self.push_query("page", paging.page);
        }
        if endpoint.accepts_count() {
            self.push_query("count", paging.count);
        }
        if endpoint.accepts_id_range() {
            self.push_query("since_id", paging.since_id);
            self.push_query("max_id", paging.max_id);
        }
        self
    }

    #[must_use]
    pub fn user(mut self, user: &UserRef) -> Self {
        self.query.push(user.query_param());
        self
    }

    #[must_use]
    pub fn form_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn form_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.form.extend(params);
        self
    }

    /// Attach a photo; the body becomes multipart.
    #[must_use]
    pub fn attachment(mut self, photo: Photo) -> Self {
        self.attachment = Some(photo);
        self
    }

    fn push_query<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
    }

    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.endpoint.method()
    }

    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }

    #[must_use]
    pub const fn photo(&self) -> Option<&Photo> {
        self.attachment.as_ref()
    }

    /// Value of a query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }

    /// Value of a form parameter.
    #[must_use]
    pub fn form_value(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }

    /// Full URL without the query string.
    #[must_use]
    pub fn url(&self, api_url: &str, upload_url: &str) -> String {
        let base = match self.endpoint.host() {
            Host::Api => api_url,
            Host::Upload => upload_url,
        };
        format!("{}/{}", base.trim_end_matches('/'), self.endpoint.path())
    }

    /// Parameters covered by the OAuth signature: query plus url-encoded form.
    #[must_use]
    pub fn signed_params(&self) -> Vec<(String, String)> {
        let mut params = self.query.clone();
        if self.attachment.is_none() {
            params.extend(self.form.iter().cloned());
        }
        params
    }
}

fn lookup<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaType;

    #[test]
    fn test_paging_maps_to_query() {
        let request = ApiRequest::new(Endpoint::HomeTimeline)
            .paging(&Paging::pages(2, 50).with_since_id(10).with_max_id(99));

        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("count"), Some("50"));
        assert_eq!(request.query_value("since_id"), Some("10"));
        assert_eq!(request.query_value("max_id"), Some("99"));
    }

    #[test]
    fn test_absent_fields_are_not_sent() {
        let request = ApiRequest::new(Endpoint::Mentions).paging(&Paging::new());
        assert!(request.query().is_empty());

        let request = ApiRequest::new(Endpoint::Mentions).paging(&Paging::pages(1, 20));
        assert_eq!(request.query_value("since_id"), None);
        assert_eq!(request.query_value("max_id"), None);
    }

    #[test]
    fn test_page_size_passes_through_above_ceiling() {
        let endpoint = Endpoint::RetweetedByMe;
        assert_eq!(endpoint.page_size_ceiling(), Some(100));

        let request = ApiRequest::new(endpoint).paging(&Paging::new().with_count(500));
        assert_eq!(request.query_value("count"), Some("500"));
    }

    #[test]
    fn test_endpoints_without_id_range_drop_it() {
        let paging = Paging::pages(3, 40).with_since_id(1).with_max_id(2);

        let favorites = ApiRequest::new(Endpoint::Favorites).paging(&paging);
        assert_eq!(favorites.query_value("page"), Some("3"));
        assert_eq!(favorites.query_value("since_id"), None);

        let retweets = ApiRequest::new(Endpoint::Retweets(7)).paging(&paging);
        assert_eq!(retweets.query_value("count"), Some("40"));
        assert_eq!(retweets.query_value("page"), None);
        assert_eq!(retweets.query_value("max_id"), None);

        let public = ApiRequest::new(Endpoint::PublicTimeline).paging(&paging);
        assert!(public.query().is_empty());
    }

    #[test]
    fn test_user_ref_params() {
        let by_id = ApiRequest::new(Endpoint::UserTimeline).user(&UserRef::Id(12));
        assert_eq!(by_id.query_value("user_id"), Some("12"));

        let by_name = ApiRequest::new(Endpoint::UserTimeline).user(&"@habuma".into());
        assert_eq!(by_name.query_value("screen_name"), Some("habuma"));
        assert_eq!(by_name.query_value("user_id"), None);
    }

    #[test]
    fn test_paths_methods_and_hosts() {
        assert_eq!(Endpoint::ShowStatus(42).path(), "statuses/show/42.json");
        assert_eq!(
            Endpoint::RetweetedByIds(42).path(),
            "statuses/42/retweeted_by/ids.json"
        );
        assert_eq!(Endpoint::CreateFavorite(5).method(), Method::POST);
        assert_eq!(Endpoint::Favorites.method(), Method::GET);

        let request = ApiRequest::new(Endpoint::UpdateStatusWithMedia);
        assert_eq!(
            request.url("https://api.example/1", "https://upload.example/1/"),
            "https://upload.example/1/statuses/update_with_media.json"
        );
        let request = ApiRequest::new(Endpoint::PublicTimeline);
        assert_eq!(
            request.url("https://api.example/1/", "https://upload.example/1"),
            "https://api.example/1/statuses/public_timeline.json"
        );
    }

    #[test]
    fn test_auth_requirements() {
        assert!(!Endpoint::PublicTimeline.requires_auth());
        assert!(!Endpoint::UserTimeline.requires_auth());
        assert!(Endpoint::OwnTimeline.requires_auth());
        assert!(!Endpoint::ShowStatus(1).requires_auth());
        assert!(!Endpoint::RetweetedBy(1).requires_auth());
        assert!(Endpoint::RetweetedByIds(1).requires_auth());
        assert!(Endpoint::RetweetedByUser.requires_auth());
        assert!(Endpoint::UpdateStatus.requires_auth());
    }

    #[test]
    fn test_multipart_form_is_not_signed() {
        let plain = ApiRequest::new(Endpoint::UpdateStatus).form_param("status", "hi");
        assert_eq!(plain.signed_params().len(), 1);

        let photo = Photo::new(vec![0x89, b'P', b'N', b'G'], MediaType::Png);
        let multipart = ApiRequest::new(Endpoint::UpdateStatusWithMedia)
            .form_param("status", "hi")
            .attachment(photo);
        assert!(multipart.signed_params().is_empty());
        assert_eq!(multipart.form_value("status"), Some("hi"));
    }
}
