//! Candidate space generation.
//!
//! Pure mapping from a query and a [`GridConfig`] to every URL worth probing.
//! No network, no state. Calendar validity is not modeled: every month gets
//! `days_per_month` days and impossible dates just come back `NotFound`.

use crate::types::{
    candidate::{CandidateUrl, TimeSlot},
    config::GridConfig,
    query::Query,
};

/// The full, enumerable set of candidates for one query.
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    base_url: String,
    query: Query,
    grid: GridConfig,
}

impl CandidateSpace {
    pub fn new(base_url: impl Into<String>, query: Query, grid: GridConfig) -> Self {
        Self {
            base_url: base_url.into(),
            query,
            grid,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Number of candidates (`months × days × indices`).
    pub fn len(&self) -> usize {
        self.grid.candidate_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The candidates of one day group, index 1 first.
    pub fn day(&self, month: u32, day: u32) -> impl Iterator<Item = CandidateUrl> + '_ {
        (1..=self.grid.indices_per_day).map(move |index| {
            CandidateUrl::new(&self.base_url, &self.query, TimeSlot::new(month, day, index))
        })
    }

    /// Day numbers probed for every month.
    pub fn days(&self) -> impl Iterator<Item = u32> {
        1..=self.grid.days_per_month
    }

    /// Every candidate in month → day → index order.
    pub fn iter(&self) -> impl Iterator<Item = CandidateUrl> + '_ {
        self.grid
            .months
            .iter()
            .flat_map(move |&month| self.days().flat_map(move |day| self.day(month, day)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn space(grid: GridConfig) -> CandidateSpace {
        CandidateSpace::new("https://telegra.ph", Query::parse("test").unwrap(), grid)
    }

    #[test]
    fn test_full_grid_is_distinct() {
        let space = space(GridConfig::default());
        let urls: HashSet<String> = space.iter().map(CandidateUrl::into_url).collect();
        assert_eq!(space.len(), 18_000);
        assert_eq!(urls.len(), 18_000);
    }

    #[test]
    fn test_day_order_and_suffixes() {
        let space = space(GridConfig::reduced(1, 1, 3));
        let urls: Vec<String> = space.day(1, 1).map(CandidateUrl::into_url).collect();
        assert_eq!(
            urls,
            vec![
                "https://telegra.ph/test-01-01",
                "https://telegra.ph/test-01-01-2",
                "https://telegra.ph/test-01-01-3",
            ]
        );
    }

    #[test]
    fn test_impossible_dates_are_still_generated() {
        let space = space(GridConfig::default().with_months([2]));
        assert!(space
            .iter()
            .any(|c| c.url() == "https://telegra.ph/test-02-30"));
    }

    proptest! {
        #[test]
        fn prop_grid_size_and_suffix_rule(
            query in "[a-z0-9][a-z0-9-]{0,15}",
            months in 1u32..=12,
            days in 1u32..=31,
            indices in 1u32..=50,
        ) {
            let query = Query::parse(&query).unwrap();
            let space = CandidateSpace::new(
                "https://telegra.ph",
                query.clone(),
                GridConfig::reduced(months, days, indices),
            );

            let mut seen = HashSet::new();
            for candidate in space.iter() {
                let slot = candidate.slot();
                let date = format!("{}-{:02}-{:02}", query, slot.month, slot.day);
                let expected = if slot.index == 1 {
                    format!("https://telegra.ph/{date}")
                } else {
                    format!("https://telegra.ph/{date}-{}", slot.index)
                };
                prop_assert_eq!(candidate.url(), expected.as_str());
                prop_assert!(seen.insert(candidate.into_url()));
            }
            prop_assert_eq!(seen.len(), (months * days * indices) as usize);
        }
    }
}
