use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::num::NonZeroU32;
use std::time::Duration;
use telegraph_finder::{FinderConfig, GridConfig};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Bot configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub telegram_api_base: String,
    pub finder: FinderConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .context("TELEGRAM_BOT_TOKEN must be set")?,
            telegram_api_base: env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_BASE.to_string()),
            finder: finder_config_from_env()?,
        })
    }
}

/// Finder settings from `FINDER_*` variables, on top of the defaults.
pub fn finder_config_from_env() -> Result<FinderConfig> {
    let _ = dotenv();
    finder_config_from(|key| env::var(key).ok())
}

/// Finder settings from an arbitrary variable lookup.
pub fn finder_config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<FinderConfig> {
    let mut config = FinderConfig::default();

    if let Some(base_url) = lookup("FINDER_BASE_URL") {
        config = config.with_base_url(base_url);
    }

    if let Some(secs) = lookup("FINDER_REQUEST_TIMEOUT_SECS") {
        let secs: u64 = secs
            .trim()
            .parse()
            .context("FINDER_REQUEST_TIMEOUT_SECS must be a valid number")?;
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    if let Some(max) = lookup("FINDER_MAX_IN_FLIGHT") {
        let max: usize = max
            .trim()
            .parse()
            .context("FINDER_MAX_IN_FLIGHT must be a valid number")?;
        config = config.with_max_in_flight(max);
    }

    if let Some(rps) = lookup("FINDER_REQUESTS_PER_SECOND") {
        let rps: NonZeroU32 = rps
            .trim()
            .parse()
            .context("FINDER_REQUESTS_PER_SECOND must be a positive number")?;
        config = config.with_requests_per_second(rps);
    }

    if let Some(months) = lookup("FINDER_MONTHS") {
        let months = parse_months(&months).context("FINDER_MONTHS must be comma-separated months")?;
        config = config.with_grid(GridConfig::default().with_months(months));
    }

    if let Some(extra) = lookup("FINDER_EXTRA_DENYLIST") {
        for entry in extra.split('|').map(str::trim).filter(|e| !e.is_empty()) {
            config = config.deny(entry);
        }
    }

    config.validate().context("Invalid finder configuration")?;
    Ok(config)
}

/// Parse "1, 2,12" into month numbers. Range checking is left to the grid.
pub fn parse_months(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| m.parse::<u32>().with_context(|| format!("not a month: {m:?}")))
        .collect()
}
