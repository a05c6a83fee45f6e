// Main entry point for the Telegram bot

use anyhow::{Context, Result};
use finder_bot::{bot::FinderBot, Config};
use telegram::{TelegramOptions, TelegramService};
use telegraph_finder::Finder;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    finder_bot::init_tracing();

    tracing::info!("Starting telegraph finder bot");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        base_url = %config.finder.base_url,
        months = config.finder.grid.months.len(),
        "Configuration loaded"
    );

    let finder = Finder::new(config.finder).context("Invalid finder configuration")?;
    let service = TelegramService::new(
        TelegramOptions::new(config.telegram_bot_token).with_api_base(config.telegram_api_base),
    );

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl-C received, stopping");
                signal.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Could not listen for Ctrl-C"),
        }
    });

    FinderBot::new(service, finder)
        .run(shutdown)
        .await
        .context("Bot loop failed")?;

    tracing::info!("Bot stopped");
    Ok(())
}
