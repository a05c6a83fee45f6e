//! Query token - the slug prefix every candidate URL starts with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FinderError, Result};

/// A URL-safe search token.
///
/// Non-empty and restricted to ASCII letters, digits and hyphens. Free text
/// must be sanitized before it gets here; this type only validates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// Validate a sanitized token.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(FinderError::invalid_query("query is empty"));
        }

        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(FinderError::invalid_query(format!(
                "unexpected character {bad:?} in {raw:?}"
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Query {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Query {
    type Error = FinderError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}
