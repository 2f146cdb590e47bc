use clap::Parser;
use twitter2mastodon::adapters::twitter::TWITTER_API_BASE;
use twitter2mastodon::utils::{logger, validation::Validate};
use twitter2mastodon::{
    CliConfig, LocalStorage, MigrationEngine, MigrationPipeline, RunOptions, RunReport,
    TwitterClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting twitter2mastodon");

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let storage = LocalStorage::new(".".to_string());
    let twitter = TwitterClient::new(
        TWITTER_API_BASE.to_string(),
        config.twitter_bearer_token.clone(),
    );
    let options = RunOptions {
        to_follow: config.to_follow.clone(),
        dry_run: config.dry_run,
    };
    let pipeline = MigrationPipeline::new(storage, config, twitter);
    let engine = MigrationEngine::new(pipeline, options);

    match engine.run().await {
        Ok(RunReport::DryRun(handles)) => {
            // Machine-readable, suitable as a --to-follow file for a later run.
            println!("{}", serde_json::to_string(&handles)?);
        }
        Ok(RunReport::Migrated(summary)) => {
            println!("Done: {}", summary);
        }
        Err(e) => {
            tracing::error!("Migration failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
