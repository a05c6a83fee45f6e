//! Configuration types for the candidate grid and probe runs.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::{FinderError, Result};

/// Host that serves the date-stamped documents.
pub const DEFAULT_BASE_URL: &str = "https://telegra.ph";

/// Number of months in a full run.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Day groups probed for every month, regardless of calendar length.
pub const DEFAULT_DAYS_PER_MONTH: u32 = 30;

/// Numbered variants probed per day (index 1 is the un-suffixed slug).
pub const DEFAULT_INDICES_PER_DAY: u32 = 50;

/// Maximum URLs per delivered message.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Per-index start offset within a day group: index `i` waits `(i - 1) * stagger`.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(100);

/// Page markers that disqualify an otherwise reachable document.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "https://t.me/SLlV_INTIM_BOT",
    "https://t.me/+YztOEovieQIzZjY8",
    "free vpn infinite time",
    "mdisk",
    "free exploits",
    "http://openroadmdnzgrna5lzkkjlqvc662o4xbgsjqi22qjek6adq4j6emaad.onion/",
];

/// Bounds of the month × day × index grid.
///
/// Every month is probed with the same `days_per_month`. Dates that do not
/// exist on the calendar (02-30, 04-31, ...) are probed anyway and simply
/// come back as `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Months to probe, 1-based, in launch order.
    pub months: Vec<u32>,

    /// Day groups per month (days 1..=days_per_month).
    pub days_per_month: u32,

    /// Indexed variants per day (indices 1..=indices_per_day).
    pub indices_per_day: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            months: (1..=MONTHS_PER_YEAR).collect(),
            days_per_month: DEFAULT_DAYS_PER_MONTH,
            indices_per_day: DEFAULT_INDICES_PER_DAY,
        }
    }
}

impl GridConfig {
    /// Full twelve-month grid with default day and index counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A shrunken grid: the first `months` months, `days` days, `indices` variants.
    pub fn reduced(months: u32, days: u32, indices: u32) -> Self {
        Self {
            months: (1..=months.min(MONTHS_PER_YEAR)).collect(),
            days_per_month: days,
            indices_per_day: indices,
        }
    }

    /// Restrict the run to a subset of months.
    ///
    /// Out-of-range and repeated months are dropped. An empty selection
    /// keeps all twelve.
    pub fn with_months(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        let mut selected: Vec<u32> = Vec::new();
        for month in months {
            if (1..=MONTHS_PER_YEAR).contains(&month) && !selected.contains(&month) {
                selected.push(month);
            }
        }
        self.months = if selected.is_empty() {
            (1..=MONTHS_PER_YEAR).collect()
        } else {
            selected
        };
        self
    }

    pub fn with_days_per_month(mut self, days: u32) -> Self {
        self.days_per_month = days;
        self
    }

    pub fn with_indices_per_day(mut self, indices: u32) -> Self {
        self.indices_per_day = indices;
        self
    }

    /// Total number of candidate URLs in the grid.
    pub fn candidate_count(&self) -> usize {
        self.months.len() * self.days_per_month as usize * self.indices_per_day as usize
    }
}

/// Configuration for a finder run.
///
/// Missing fields deserialize to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Scheme and host prefixed to every slug
    pub base_url: String,

    /// Candidate grid bounds
    pub grid: GridConfig,

    /// Start offset between consecutive indices of one day.
    ///
    /// Default: 100ms, so a day's 50 probes spread over ~5 seconds.
    pub stagger: Duration,

    /// Maximum URLs per delivered message. Default: 50.
    pub chunk_size: usize,

    /// Body substrings that mark a page as unwanted (case-sensitive).
    pub denylist: Vec<String>,

    /// Per-request timeout. Default: none (transport defaults apply).
    pub request_timeout: Option<Duration>,

    /// Cap on simultaneously in-flight fetches. Default: uncapped.
    pub max_in_flight: Option<usize>,

    /// Global request rate cap. Default: none.
    pub requests_per_second: Option<NonZeroU32>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            grid: GridConfig::default(),
            stagger: DEFAULT_STAGGER,
            chunk_size: DEFAULT_CHUNK_SIZE,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            request_timeout: None,
            max_in_flight: None,
            requests_per_second: None,
        }
    }
}

impl FinderConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the candidate grid.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Set the per-index stagger.
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Set the delivery chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Replace the denylist.
    pub fn with_denylist(mut self, entries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.denylist = entries.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Append a denylist entry.
    pub fn deny(mut self, entry: impl Into<String>) -> Self {
        self.denylist.push(entry.into());
        self
    }

    /// Set a per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Cap the number of simultaneously in-flight fetches.
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = Some(max);
        self
    }

    /// Cap the global request rate.
    pub fn with_requests_per_second(mut self, rps: NonZeroU32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Check the config for values that would make a run meaningless or hang.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| FinderError::config(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FinderError::config(format!(
                "base_url must be http(s), got {}",
                parsed.scheme()
            )));
        }

        if self.grid.months.is_empty() {
            return Err(FinderError::config("grid has no months"));
        }
        if let Some(month) = self
            .grid
            .months
            .iter()
            .find(|m| !(1..=MONTHS_PER_YEAR).contains(*m))
        {
            return Err(FinderError::config(format!("month {month} out of range")));
        }
        if self.grid.days_per_month == 0 {
            return Err(FinderError::config("days_per_month must be > 0"));
        }
        if self.grid.indices_per_day == 0 {
            return Err(FinderError::config("indices_per_day must be > 0"));
        }
        if self.chunk_size == 0 {
            return Err(FinderError::config("chunk_size must be > 0"));
        }
        if self.max_in_flight == Some(0) {
            return Err(FinderError::config("max_in_flight must be > 0"));
        }

        Ok(())
    }
}
