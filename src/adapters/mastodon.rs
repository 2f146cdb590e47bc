use crate::adapters::expect_success;
use crate::domain::model::Account;
use crate::utils::error::{MigrateError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use uuid::Uuid;

pub const OAUTH_SCOPES: &str = "read write:follows";
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// App names must be unique per registration, so re-running registration on
/// the same instance gets a fresh nonce.
pub fn unique_client_name() -> String {
    format!("twitter2mastodon-{}", Uuid::new_v4())
}

/// Client id/secret produced by app registration, persisted to the secret
/// file as three lines: client id, client secret, instance base URL.
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
}

impl AppCredentials {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut lines = contents.lines();
        let (client_id, client_secret, base_url) =
            match (lines.next(), lines.next(), lines.next()) {
                (Some(id), Some(secret), Some(url)) => (id, secret, url),
                _ => {
                    return Err(MigrateError::ConfigError {
                        message: format!(
                            "Malformed client secret file {}: expected client id, \
                             client secret and instance URL on separate lines",
                            path
                        ),
                    })
                }
            };
        Ok(Self {
            client_id: client_id.trim().to_string(),
            client_secret: client_secret.trim().to_string(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let contents = format!(
            "{}\n{}\n{}\n",
            self.client_id, self.client_secret, self.base_url
        );
        fs::write(path, contents)?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct AppResponse {
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct InstanceInfo {
    uri: String,
}

/// Registers a new OAuth app on the instance.
pub async fn register_app(base_url: &str, client_name: &str) -> Result<AppCredentials> {
    let base_url = base_url.trim_end_matches('/');
    let client = Client::new();
    let params = [
        ("client_name", client_name),
        ("redirect_uris", REDIRECT_URI),
        ("scopes", OAUTH_SCOPES),
    ];

    let response = client
        .post(format!("{}/api/v1/apps", base_url))
        .form(&params)
        .send()
        .await?;
    let app: AppResponse = expect_success(response).await?.json().await?;

    Ok(AppCredentials {
        client_id: app.client_id,
        client_secret: app.client_secret,
        base_url: base_url.to_string(),
    })
}

/// An authenticated Mastodon session. Acquired once per run via [`log_in`];
/// the token needs no explicit teardown and is released at process exit.
///
/// [`log_in`]: MastodonSession::log_in
#[derive(Debug)]
pub struct MastodonSession {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MastodonSession {
    pub async fn log_in(
        credentials: &AppCredentials,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let client = Client::new();
        let params = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("username", username),
            ("password", password),
            ("scope", OAUTH_SCOPES),
        ];

        let response = client
            .post(format!("{}/oauth/token", credentials.base_url))
            .form(&params)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(MigrateError::AuthError {
                message: format!("Mastodon login failed with status {}: {}", status, body),
            });
        }
        let token: TokenResponse = response.json().await?;

        Ok(Self {
            client,
            base_url: credentials.base_url.clone(),
            access_token: token.access_token,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).bearer_auth(&self.access_token)
    }

    pub async fn verify_credentials(&self) -> Result<Account> {
        let url = format!("{}/api/v1/accounts/verify_credentials", self.base_url);
        let response = self.get(&url).send().await?;
        let account = expect_success(response).await?.json().await?;
        Ok(account)
    }

    /// The home instance domain, used for suffix-aware handle equivalence.
    pub async fn instance_uri(&self) -> Result<String> {
        let url = format!("{}/api/v1/instance", self.base_url);
        let response = self.get(&url).send().await?;
        let instance: InstanceInfo = expect_success(response).await?.json().await?;
        Ok(instance.uri)
    }

    /// Paginates the full follow-relationship list via `Link` headers.
    pub async fn following(&self, account_id: &str) -> Result<Vec<Account>> {
        let mut url = format!(
            "{}/api/v1/accounts/{}/following",
            self.base_url, account_id
        );
        let mut accounts = Vec::new();

        loop {
            let response = self.get(&url).send().await?;
            let response = expect_success(response).await?;
            let next = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_next_link);

            let page: Vec<Account> = response.json().await?;
            accounts.extend(page);

            match next {
                Some(next_url) => url = next_url,
                None => break,
            }
        }

        Ok(accounts)
    }

    pub async fn search_accounts(&self, query: &str) -> Result<Vec<Account>> {
        let url = format!("{}/api/v1/accounts/search", self.base_url);
        let response = self.get(&url).query(&[("q", query)]).send().await?;
        let accounts = expect_success(response).await?.json().await?;
        Ok(accounts)
    }

    pub async fn follow(&self, account_id: &str) -> Result<()> {
        let url = format!("{}/api/v1/accounts/{}/follow", self.base_url, account_id);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }
}

/// Extracts the `rel="next"` URL from a `Link` header value.
fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let mut sections = part.split(';');
        let url = match sections.next() {
            Some(url) => url.trim(),
            None => continue,
        };
        if !url.starts_with('<') || !url.ends_with('>') {
            continue;
        }
        if sections.any(|s| s.trim() == "rel=\"next\"") {
            return Some(url[1..url.len() - 1].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    async fn logged_in_session(server: &MockServer) -> MastodonSession {
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "token123"}));
        });

        let credentials = AppCredentials {
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            base_url: server.base_url(),
        };
        MastodonSession::log_in(&credentials, "user@example.social", "hunter2")
            .await
            .unwrap()
    }

    #[test]
    fn test_parse_next_link() {
        let header = "<https://example.social/api/v1/accounts/1/following?max_id=10>; \
                      rel=\"next\", <https://example.social/api/v1/accounts/1/following>; \
                      rel=\"prev\"";
        assert_eq!(
            parse_next_link(header),
            Some("https://example.social/api/v1/accounts/1/following?max_id=10".to_string())
        );
    }

    #[test]
    fn test_parse_next_link_without_next() {
        let header = "<https://example.social/x>; rel=\"prev\"";
        assert_eq!(parse_next_link(header), None);
        assert_eq!(parse_next_link(""), None);
    }

    #[test]
    fn test_credentials_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.secret");
        let path = path.to_str().unwrap();

        let credentials = AppCredentials {
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            base_url: "https://example.social".to_string(),
        };
        credentials.save(path).unwrap();

        let loaded = AppCredentials::load(path).unwrap();
        assert_eq!(loaded.client_id, "cid");
        assert_eq!(loaded.client_secret, "csecret");
        assert_eq!(loaded.base_url, "https://example.social");
    }

    #[test]
    fn test_malformed_credentials_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.secret");
        std::fs::write(&path, "only-one-line\n").unwrap();

        let err = AppCredentials::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, MigrateError::ConfigError { .. }));
    }

    #[tokio::test]
    async fn test_log_in_failure_is_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(401)
                .json_body(serde_json::json!({"error": "invalid_grant"}));
        });

        let credentials = AppCredentials {
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            base_url: server.base_url(),
        };
        let err = MastodonSession::log_in(&credentials, "user", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(err, MigrateError::AuthError { .. }));
    }

    #[tokio::test]
    async fn test_following_follows_link_header_pagination() {
        let server = MockServer::start();
        let session = logged_in_session(&server).await;

        let next_url = server.url("/api/v1/accounts/1/following?max_id=2");
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/accounts/1/following")
                .query_param("max_id", "2");
            then.status(200).json_body(serde_json::json!([
                {"id": "2", "acct": "bob@fosstodon.org", "locked": false}
            ]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/accounts/1/following")
                .matches(|req| {
                    req.query_params
                        .as_ref()
                        .map_or(true, |params| !params.iter().any(|(k, _)| k == "max_id"))
                });
            then.status(200)
                .header("Link", format!("<{}>; rel=\"next\"", next_url))
                .json_body(serde_json::json!([
                    {"id": "1", "acct": "alice", "locked": false}
                ]));
        });

        let accounts = session.following("1").await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].acct, "alice");
        assert_eq!(accounts[1].acct, "bob@fosstodon.org");
    }

    #[tokio::test]
    async fn test_search_deserializes_moved_account() {
        let server = MockServer::start();
        let session = logged_in_session(&server).await;

        server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/accounts/search")
                .query_param("q", "@alice@old.example");
            then.status(200).json_body(serde_json::json!([{
                "id": "1",
                "acct": "alice@old.example",
                "locked": false,
                "moved": {"id": "9", "acct": "alice@new.example", "locked": false}
            }]));
        });

        let accounts = session.search_accounts("@alice@old.example").await.unwrap();
        assert_eq!(accounts.len(), 1);
        let moved = accounts[0].moved.as_ref().unwrap();
        assert_eq!(moved.acct, "alice@new.example");
        assert_eq!(moved.id, "9");
    }

    #[tokio::test]
    async fn test_follow_posts_to_account_id() {
        let server = MockServer::start();
        let session = logged_in_session(&server).await;

        let follow_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/accounts/123/follow")
                .header("authorization", "Bearer token123");
            then.status(200)
                .json_body(serde_json::json!({"id": "123", "following": true}));
        });

        session.follow("123").await.unwrap();
        follow_mock.assert();
    }

    #[test]
    fn test_unique_client_name_carries_a_nonce() {
        let first = unique_client_name();
        let second = unique_client_name();
        assert!(first.starts_with("twitter2mastodon-"));
        assert!(first.len() > "twitter2mastodon-".len());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_register_app_returns_credentials() {
        let server = MockServer::start();
        let app_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/apps")
                .body_contains("client_name=twitter2mastodon-");
            then.status(200).json_body(serde_json::json!({
                "id": "5",
                "client_id": "new-cid",
                "client_secret": "new-secret"
            }));
        });

        let credentials = register_app(&server.base_url(), &unique_client_name())
            .await
            .unwrap();

        app_mock.assert();
        assert_eq!(credentials.client_id, "new-cid");
        assert_eq!(credentials.client_secret, "new-secret");
        assert_eq!(credentials.base_url, server.base_url());
    }
}
