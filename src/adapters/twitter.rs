use crate::adapters::expect_success;
use crate::domain::model::SourceUser;
use crate::domain::ports::Storage;
use crate::utils::error::{MigrateError, Result};
use reqwest::Client;
use serde::Deserialize;

pub const TWITTER_API_BASE: &str = "https://api.twitter.com";

const PAGE_SIZE: u32 = 1000;

pub fn cache_file_name(username: &str) -> String {
    format!("twitter_{}_following.json", username)
}

#[derive(Deserialize)]
struct UserLookupResponse {
    data: UserRef,
}

#[derive(Deserialize)]
struct UserRef {
    id: String,
}

#[derive(Deserialize)]
struct FollowingPage {
    #[serde(default)]
    data: Vec<SourceUser>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Deserialize, Default)]
struct PageMeta {
    next_token: Option<String>,
}

pub struct TwitterClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterClient {
    pub fn new(base_url: String, bearer_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    pub async fn lookup_user_id(&self, username: &str) -> Result<String> {
        let url = format!("{}/2/users/by/username/{}", self.base_url, username);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;
        let lookup: UserLookupResponse = expect_success(response).await?.json().await?;
        Ok(lookup.data.id)
    }

    /// Paginates the full following list via `meta.next_token`.
    pub async fn following(&self, user_id: &str) -> Result<Vec<SourceUser>> {
        let url = format!("{}/2/users/{}/following", self.base_url, user_id);
        let mut users = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .query(&[("max_results", PAGE_SIZE)])
                .query(&[("user.fields", "username,name,description")]);
            if let Some(token) = &next_token {
                request = request.query(&[("pagination_token", token.as_str())]);
            }

            let response = request.send().await?;
            let page: FollowingPage = expect_success(response).await?.json().await?;
            users.extend(page.data);

            match page.meta.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(users)
    }

    /// Returns the following list for `username`, from the on-disk cache when
    /// present. The cache has no expiry; `no_cache` is the only way to force
    /// a refresh.
    pub async fn fetch_following<S: Storage>(
        &self,
        storage: &S,
        username: &str,
        no_cache: bool,
    ) -> Result<Vec<SourceUser>> {
        let cache_file = cache_file_name(username);

        if !no_cache && storage.exists(&cache_file).await {
            tracing::debug!("Loading Twitter following list from {}", cache_file);
            let data = storage.read_file(&cache_file).await?;
            let users = serde_json::from_slice(&data)?;
            return Ok(users);
        }

        if self.bearer_token.is_empty() {
            return Err(MigrateError::ConfigError {
                message: "Twitter Bearer token is required".to_string(),
            });
        }

        let user_id = self.lookup_user_id(username).await?;
        let users = self.following(&user_id).await?;

        storage
            .write_file(&cache_file, &serde_json::to_vec(&users)?)
            .await?;

        Ok(users)
    }
}
