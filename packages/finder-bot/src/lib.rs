//! Front ends for the telegraph finder: a Telegram bot and a one-shot CLI.
//!
//! - [`config`] - Environment configuration
//! - [`sanitize`] - Free text to query token
//! - [`adapters`] - Chat collaborators (Telegram, console)
//! - [`bot`] - Long-polling command loop

pub mod adapters;
pub mod bot;
pub mod config;
pub mod sanitize;

pub use config::Config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telegraph_finder=debug,finder_bot=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();
}
