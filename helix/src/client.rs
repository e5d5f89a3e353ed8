use crate::{
    api::{
        FollowQuery,
        HelixApi,
    },
    auth::AccessToken,
    DataResponse,
    FollowTotal,
    HelixError,
    HelixResult,
    HelixStream,
    HelixUser,
    HelixVideo,
    Page,
    PAGE_LIMIT,
};
use futures::future::{
    BoxFuture,
    FutureExt as _,
};
use reqwest::header::{
    HeaderMap,
    HeaderValue,
    AUTHORIZATION,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
};
use std::time::Duration;
use url::Url;

/// Everything needed to open a session.
#[derive(Clone)]
pub struct HelixSettings {
    pub api_url: Url,
    pub auth_url: Url,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

/// An authenticated Helix session. Cheap to share, all requests go through one connection pool.
#[derive(Debug, Clone)]
pub struct HelixClient {
    http: reqwest::Client,
    api_url: Url,
    token: AccessToken,
}

impl HelixClient {
    /// Opens a session. Uses the configured user token if there is one, otherwise requests an app access token.
    #[instrument(level = "debug", skip_all, fields(api_url = %settings.api_url))]
    pub async fn connect(settings: HelixSettings) -> HelixResult<Self> {
        let token = match settings.access_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                debug!("using configured user access token");
                AccessToken::user(token)
            }
            None => {
                let http = reqwest::Client::builder().timeout(settings.timeout).build()?;
                AccessToken::request_app_token(
                    &http,
                    &with_trailing_slash(settings.auth_url),
                    &settings.client_id,
                    &settings.client_secret,
                )
                .await?
            }
        };

        Self::with_token(
            with_trailing_slash(settings.api_url),
            &settings.client_id,
            token,
            settings.timeout,
        )
    }

    pub fn with_token(api_url: Url, client_id: &str, token: AccessToken, timeout: Duration) -> HelixResult<Self> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.secret()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Client-Id", HeaderValue::from_str(client_id)?);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: with_trailing_slash(api_url),
            token,
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// GET `endpoint` relative to the api url and decode the json body.
    async fn get<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> HelixResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url.join(endpoint)?;
        let response = self.http.get(url).query(query).send().await?;

        if let (Some(remaining), Some(limit)) = (
            response.headers().get("ratelimit-remaining"),
            response.headers().get("ratelimit-limit"),
        ) {
            trace!(?remaining, ?limit, endpoint, "rate-limit bucket");
        }

        let status = response.status();
        if !status.is_success() {
            // Helix error bodies look like {"error": "...", "status": 401, "message": "..."}
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message.or(body.error));
            warn!(status = status.as_u16(), ?message, endpoint, "helix request failed");
            return Err(HelixError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    #[instrument(level = "debug", skip(self, ids), fields(ids = ids.len()))]
    async fn users(&self, ids: &[u64]) -> HelixResult<Vec<HelixUser>> {
        let ids = ids.iter().map(u64::to_string).collect::<Vec<_>>();
        let query = ids.iter().map(|id| ("id", id.as_str())).collect::<Vec<_>>();
        let response: DataResponse<HelixUser> = self.get("users", &query).await?;
        debug!(resolved = response.data.len(), "fetched users");
        Ok(response.data)
    }

    #[instrument(level = "debug", skip(self, user_ids), fields(user_ids = user_ids.len()))]
    async fn streams(&self, user_ids: &[String], after: Option<&str>) -> HelixResult<Page<HelixStream>> {
        let first = PAGE_LIMIT.to_string();
        let mut query = vec![("first", first.as_str())];
        query.extend(user_ids.iter().map(|id| ("user_id", id.as_str())));
        if let Some(after) = after {
            query.push(("after", after));
        }
        self.get("streams", &query).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn follow_total(&self, query: FollowQuery<'_>) -> HelixResult<u64> {
        let response: FollowTotal = self.get("users/follows", &[query.query_param()]).await?;
        Ok(response.total)
    }

    #[instrument(level = "debug", skip(self))]
    async fn videos(&self, user_id: &str, after: Option<&str>) -> HelixResult<Page<HelixVideo>> {
        let first = PAGE_LIMIT.to_string();
        let mut query = vec![("first", first.as_str()), ("user_id", user_id)];
        if let Some(after) = after {
            query.push(("after", after));
        }
        self.get("videos", &query).await
    }
}

impl HelixApi for HelixClient {
    fn get_users<'a>(&'a self, ids: &'a [u64]) -> BoxFuture<'a, HelixResult<Vec<HelixUser>>> {
        self.users(ids).boxed()
    }

    fn get_streams<'a>(
        &'a self,
        user_ids: &'a [String],
        after: Option<&'a str>,
    ) -> BoxFuture<'a, HelixResult<Page<HelixStream>>> {
        self.streams(user_ids, after).boxed()
    }

    fn get_follow_total<'a>(&'a self, query: FollowQuery<'a>) -> BoxFuture<'a, HelixResult<u64>> {
        self.follow_total(query).boxed()
    }

    fn get_videos<'a>(
        &'a self,
        user_id: &'a str,
        after: Option<&'a str>,
    ) -> BoxFuture<'a, HelixResult<Page<HelixVideo>>> {
        self.videos(user_id, after).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// `Url::join` drops the last path segment unless the base ends with a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
