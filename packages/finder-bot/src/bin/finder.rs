// One-shot command line front end

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use finder_bot::{
    adapters::{ConsoleDelivery, ConsoleReporter},
    config::finder_config_from_env,
    sanitize::sanitize,
};
use std::num::NonZeroU32;
use std::time::Duration;
use telegraph_finder::{ChatTarget, Finder, GridConfig, HttpFetcher, ProbeVerdict};

/// Find telegra.ph pages published under a query.
#[derive(Parser, Debug)]
#[command(name = "finder", version, about)]
struct Args {
    /// Free text to search for (transliterated and slugified)
    query: Vec<String>,

    /// Only probe these months, e.g. --months 1,2,12
    #[arg(long, value_delimiter = ',')]
    months: Vec<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum simultaneous requests
    #[arg(long)]
    concurrent: Option<usize>,

    /// Global requests per second
    #[arg(long)]
    rps: Option<NonZeroU32>,

    /// Delay between indices of one day, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Site to probe instead of telegra.ph
    #[arg(long)]
    base_url: Option<String>,

    /// Check a single URL and exit
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    finder_bot::init_tracing();
    let args = Args::parse();

    let mut config = finder_config_from_env()?;
    if !args.months.is_empty() {
        config = config.with_grid(GridConfig::default().with_months(args.months.iter().copied()));
    }
    if let Some(secs) = args.timeout {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    if let Some(max) = args.concurrent {
        config = config.with_max_in_flight(max);
    }
    if let Some(rps) = args.rps {
        config = config.with_requests_per_second(rps);
    }
    if let Some(ms) = args.delay_ms {
        config = config.with_stagger(Duration::from_millis(ms));
    }
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    let request_timeout = config.request_timeout;
    let finder = Finder::new(config).context("Invalid configuration")?;

    if let Some(url) = args.url {
        let fetcher = HttpFetcher::new(request_timeout)?;
        match finder.check_url(&url, fetcher).await {
            ProbeVerdict::Found(url) => println!("{} {}", "found".bright_green().bold(), url),
            ProbeVerdict::Filtered => println!("{} {}", "filtered".yellow(), url),
            ProbeVerdict::NotFound => println!("{} {}", "not found".red(), url),
        }
        return Ok(());
    }

    if args.query.is_empty() {
        bail!("a query is required (or pass --url)");
    }
    let query = sanitize(&args.query.join(" ")).context("Query is empty after sanitizing")?;
    eprintln!("{} {}", "searching".bright_cyan().bold(), query);

    let report = finder
        .run_http(query.as_str(), ChatTarget::new(0, 0), &ConsoleReporter, &ConsoleDelivery)
        .await?;

    eprintln!(
        "{} probed, {} filtered, {} absent",
        report.probed, report.filtered, report.not_found
    );
    Ok(())
}
