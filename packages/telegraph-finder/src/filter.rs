//! Content filter - drops reachable pages whose body matches the denylist.

use crate::types::config::DEFAULT_DENYLIST;

/// Exact, case-sensitive substring denylist.
///
/// A match means the page exists but is spam, a redirector, or otherwise
/// unwanted. Entries are plain substrings; nothing is normalized.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    denylist: Vec<String>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().copied())
    }
}

impl ContentFilter {
    /// Build a filter from denylist entries. Empty entries are ignored,
    /// since an empty needle would match every body.
    pub fn new(entries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            denylist: entries
                .into_iter()
                .map(Into::into)
                .filter(|e: &String| !e.is_empty())
                .collect(),
        }
    }

    /// Add another entry.
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        if !entry.is_empty() {
            self.denylist.push(entry);
        }
        self
    }

    /// First denylist entry found in `body`.
    pub fn matching(&self, body: &str) -> Option<&str> {
        self.denylist
            .iter()
            .find(|entry| body.contains(entry.as_str()))
            .map(String::as_str)
    }

    /// True if `body` contains any denylist entry.
    pub fn matches(&self, body: &str) -> bool {
        self.matching(body).is_some()
    }

    pub fn entries(&self) -> &[String] {
        &self.denylist
    }
}
