//! Data types shared across the finder pipeline.

pub mod candidate;
pub mod config;
pub mod query;
pub mod verdict;
