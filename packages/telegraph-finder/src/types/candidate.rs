//! Time slots and the candidate URLs derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::query::Query;

/// One cell of the month × day × index grid (all 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    pub month: u32,
    pub day: u32,
    pub index: u32,
}

impl TimeSlot {
    pub fn new(month: u32, day: u32, index: u32) -> Self {
        Self { month, day, index }
    }

    /// Slug for this slot: `{query}-{MM}-{DD}` for index 1, `{query}-{MM}-{DD}-{index}` otherwise.
    pub fn slug(&self, query: &Query) -> String {
        if self.index <= 1 {
            format!("{}-{:02}-{:02}", query, self.month, self.day)
        } else {
            format!("{}-{:02}-{:02}-{}", query, self.month, self.day, self.index)
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}#{}", self.month, self.day, self.index)
    }
}

/// A URL guessed from a query and a time slot, not yet confirmed to exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateUrl {
    slot: TimeSlot,
    url: String,
}

impl CandidateUrl {
    /// Build the candidate for `slot` under `base_url` (trailing slashes ignored).
    pub fn new(base_url: &str, query: &Query, slot: TimeSlot) -> Self {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), slot.slug(query));
        Self { slot, url }
    }

    pub fn slot(&self) -> TimeSlot {
        self.slot
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> Query {
        Query::parse("test").unwrap()
    }

    #[test]
    fn test_first_index_has_no_suffix() {
        let candidate = CandidateUrl::new("https://telegra.ph", &query(), TimeSlot::new(1, 1, 1));
        assert_eq!(candidate.url(), "https://telegra.ph/test-01-01");
    }

    #[test]
    fn test_later_indices_append_suffix() {
        let candidate = CandidateUrl::new("https://telegra.ph/", &query(), TimeSlot::new(11, 9, 2));
        assert_eq!(candidate.url(), "https://telegra.ph/test-11-09-2");

        let candidate = CandidateUrl::new("https://telegra.ph", &query(), TimeSlot::new(12, 30, 50));
        assert_eq!(candidate.url(), "https://telegra.ph/test-12-30-50");
    }
}
