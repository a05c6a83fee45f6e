//! Probe verdicts and the per-run report.

use serde::{Deserialize, Serialize};

use crate::types::query::Query;

/// Outcome of probing one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeVerdict {
    /// Page exists and passed the content filter
    Found(String),

    /// Page is absent, or the probe failed at the network layer
    NotFound,

    /// Page exists but its body matched the denylist
    Filtered,
}

impl ProbeVerdict {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The surviving URL, if any. Empty URLs never count as found.
    pub fn found_url(&self) -> Option<&str> {
        match self {
            Self::Found(url) if !url.is_empty() => Some(url),
            _ => None,
        }
    }

    pub fn into_found_url(self) -> Option<String> {
        match self {
            Self::Found(url) if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

/// Totals for one finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Query token the run was for
    pub query: Query,

    /// Verdicts collected at the completion barrier
    pub probed: usize,

    /// `Filtered` verdicts
    pub filtered: usize,

    /// `NotFound` verdicts (absent pages and network failures)
    pub not_found: usize,

    /// Surviving URLs in completion order
    pub urls: Vec<String>,

    /// Chunks the delivery collaborator accepted
    pub chunks_delivered: usize,

    /// Chunks the delivery collaborator rejected
    pub chunks_failed: usize,

    /// Whether the closing "found N links" message went out
    pub summary_delivered: bool,
}

impl RunReport {
    /// Number of surviving URLs.
    pub fn found(&self) -> usize {
        self.urls.len()
    }
}
