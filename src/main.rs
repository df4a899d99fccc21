use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod error;
mod extract;
mod handlers;
mod router;
mod schemas;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmbook=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .init();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
