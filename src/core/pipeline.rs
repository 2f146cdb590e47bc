use crate::adapters::mastodon::{AppCredentials, MastodonSession};
use crate::adapters::twitter::TwitterClient;
use crate::core::extract::extract_handle;
use crate::core::follow::follow_all;
use crate::core::following::FollowingSet;
use crate::domain::model::{MigrationSummary, SourceUser};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;

/// Snapshot of the current Mastodon following set, dumped for inspection.
/// It is never read back.
pub const MASTODON_FOLLOWING_SNAPSHOT: &str = "mastodon_following.json";

pub struct MigrationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    twitter: TwitterClient,
}

impl<S: Storage, C: ConfigProvider> MigrationPipeline<S, C> {
    pub fn new(storage: S, config: C, twitter: TwitterClient) -> Self {
        Self {
            storage,
            config,
            twitter,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MigrationPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceUser>> {
        self.twitter
            .fetch_following(
                &self.storage,
                self.config.twitter_username(),
                self.config.no_cache(),
            )
            .await
    }

    async fn transform(&self, users: Vec<SourceUser>) -> Result<Vec<String>> {
        Ok(users.iter().filter_map(extract_handle).collect())
    }

    async fn load(&self, handles: Vec<String>) -> Result<MigrationSummary> {
        let credentials = AppCredentials::load(self.config.client_id_file())?;
        let session = MastodonSession::log_in(
            &credentials,
            self.config.mastodon_username(),
            self.config.mastodon_password(),
        )
        .await?;

        let me = session.verify_credentials().await?;
        let instance = session.instance_uri().await?;
        let accounts = session.following(&me.id).await?;
        let followed: Vec<String> = accounts.iter().map(|a| format!("@{}", a.acct)).collect();
        let following = FollowingSet::new(instance, followed.iter().cloned());
        tracing::debug!(
            "currently following {} Mastodon users",
            following.len()
        );

        self.storage
            .write_file(MASTODON_FOLLOWING_SNAPSHOT, &serde_json::to_vec(&followed)?)
            .await?;

        follow_all(&session, &following, &handles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use tempfile::TempDir;

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn twitter_username(&self) -> &str {
            "tester"
        }
        fn mastodon_username(&self) -> &str {
            "tester@example.social"
        }
        fn mastodon_password(&self) -> &str {
            "hunter2"
        }
        fn client_id_file(&self) -> &str {
            "twitter2mastodon.secret"
        }
        fn no_cache(&self) -> bool {
            false
        }
    }

    fn user(username: &str, description: &str) -> SourceUser {
        SourceUser {
            username: username.to_string(),
            name: String::new(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_transform_keeps_only_users_with_handles() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        let twitter = TwitterClient::new("http://unused.invalid".to_string(), String::new());
        let pipeline = MigrationPipeline::new(storage, MockConfig, twitter);

        let users = vec![
            user("alice", "on the fediverse: @alice@example.social"),
            user("bob", "no handle here"),
            user("carol", "reach me at @carol@mstdn.io."),
        ];

        let handles = pipeline.transform(users).await.unwrap();
        assert_eq!(
            handles,
            vec![
                "@alice@example.social".to_string(),
                "@carol@mstdn.io".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_transform_empty_input() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        let twitter = TwitterClient::new("http://unused.invalid".to_string(), String::new());
        let pipeline = MigrationPipeline::new(storage, MockConfig, twitter);

        let handles = pipeline.transform(Vec::new()).await.unwrap();
        assert!(handles.is_empty());
    }
}
