use clap::Parser;
use twitter2mastodon::adapters::mastodon::{register_app, unique_client_name};
use twitter2mastodon::utils::logger;
use twitter2mastodon::utils::validation::validate_url;

#[derive(Debug, Parser)]
#[command(name = "register_app")]
#[command(about = "Register the twitter2mastodon OAuth app on a Mastodon instance")]
struct RegisterArgs {
    /// Base URL of the instance, e.g. https://mastodon.social
    instance_url: String,

    /// Where to write the client credentials
    #[arg(long, default_value = "twitter2mastodon.secret")]
    output: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = RegisterArgs::parse();
    logger::init_cli_logger(false);

    validate_url("instance_url", &args.instance_url)?;

    let credentials = register_app(&args.instance_url, &unique_client_name()).await?;
    credentials.save(&args.output)?;

    tracing::info!("Registered app on {}", credentials.base_url);
    println!("Client credentials written to {}", args.output);

    Ok(())
}
