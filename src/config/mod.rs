use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "twitter2mastodon")]
#[command(about = "Migrate Twitter following users to Mastodon")]
pub struct CliConfig {
    /// Twitter account whose following list is migrated
    #[arg(long, env = "TWITTER_USERNAME")]
    pub twitter_username: String,

    #[arg(
        long,
        env = "TWITTER_BEARER_TOKEN",
        default_value = "",
        hide_env_values = true
    )]
    pub twitter_bearer_token: String,

    #[arg(long, env = "MASTODON_USERNAME", default_value = "")]
    pub mastodon_username: String,

    #[arg(
        long,
        env = "MASTODON_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub mastodon_password: String,

    /// Path to the client secret file written by register_app
    #[arg(
        long,
        env = "MASTODON_CLIENT_ID",
        default_value = "twitter2mastodon.secret"
    )]
    pub mastodon_client_id: String,

    /// JSON file with pre-resolved Mastodon handles, bypassing Twitter entirely
    #[arg(long)]
    pub to_follow: Option<String>,

    /// Print the resolved handles to stdout instead of following them
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore the on-disk Twitter following cache
    #[arg(long)]
    pub no_cache: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.to_follow {
            validate_path("to_follow", path)?;
        }

        // Mastodon credentials are only needed once we actually follow.
        if !self.dry_run {
            validate_non_empty_string("mastodon_username", &self.mastodon_username)?;
            validate_non_empty_string("mastodon_password", &self.mastodon_password)?;
            validate_path("mastodon_client_id", &self.mastodon_client_id)?;
        }

        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn twitter_username(&self) -> &str {
        &self.twitter_username
    }

    fn mastodon_username(&self) -> &str {
        &self.mastodon_username
    }

    fn mastodon_password(&self) -> &str {
        &self.mastodon_password
    }

    fn client_id_file(&self) -> &str {
        &self.mastodon_client_id
    }

    fn no_cache(&self) -> bool {
        self.no_cache
    }
}
