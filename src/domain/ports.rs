use crate::domain::model::{MigrationSummary, SourceUser};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn twitter_username(&self) -> &str;
    fn mastodon_username(&self) -> &str;
    fn mastodon_password(&self) -> &str;
    fn client_id_file(&self) -> &str;
    fn no_cache(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Fetch the Twitter following list (possibly from the on-disk cache).
    async fn extract(&self) -> Result<Vec<SourceUser>>;
    /// Extract candidate Mastodon handles from the fetched records.
    async fn transform(&self, users: Vec<SourceUser>) -> Result<Vec<String>>;
    /// Follow the candidate handles on Mastodon.
    async fn load(&self, handles: Vec<String>) -> Result<MigrationSummary>;
}
