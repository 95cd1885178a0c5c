mod commands;
mod render;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gmb")]
#[command(about = "Review and reply to Google Business Profile reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and print one location record
    Location {
        /// Place id of the location
        place_id: String,
    },
    /// List reviews that have no reply yet
    Reviews,
    /// Draft and submit a reply to one review
    Reply {
        /// Review id as shown by `gmb reviews`
        review_id: String,
        /// Submit the first generated draft without prompting
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = gmb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(command = ?cli.command, "dispatching");
    let ctx = commands::Context::from_config(&config)?;

    match cli.command {
        Commands::Location { place_id } => commands::run_location(&ctx, &place_id).await,
        Commands::Reviews => commands::run_reviews(&ctx).await,
        Commands::Reply { review_id, yes } => {
            commands::run_reply(&ctx, &config, &review_id, yes).await
        }
    }
}

#[cfg(test)]
mod tests;
