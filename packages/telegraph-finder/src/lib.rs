//! Telegraph Slug Finder Library
//!
//! Finds published telegra.ph pages for a query by probing every slug the
//! site could have generated for it: `{query}-{MM}-{DD}` plus the numbered
//! collisions `{query}-{MM}-{DD}-{N}`.
//!
//! # How a run works
//!
//! - A 12 × 30 × 50 grid of candidate URLs is generated from the query
//! - Every candidate is fetched once, month groups concurrently, indices
//!   within a day staggered
//! - Pages that exist and do not match the denylist survive
//! - Survivors are delivered in chunks of 50, then a closing count
//!
//! # Usage
//!
//! ```rust,ignore
//! use telegraph_finder::{ChatTarget, Finder, FinderConfig};
//!
//! let finder = Finder::new(FinderConfig::default())?;
//! let report = finder
//!     .run_http("spring-sale", ChatTarget::new(chat_id, message_id), &reporter, &delivery)
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (PageFetcher, ProgressReporter, BatchDelivery)
//! - [`types`] - Query, candidates, verdicts, configuration
//! - [`candidates`] - Candidate space generation
//! - [`filter`] - Content denylist
//! - [`pipeline`] - Probe worker, scheduler, aggregator and the Finder
//! - [`fetchers`] - HTTP and rate-limited fetchers
//! - [`testing`] - Mock implementations for testing

pub mod candidates;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use candidates::CandidateSpace;
pub use error::{DeliveryError, FinderError, ProbeError};
pub use filter::ContentFilter;
pub use traits::{
    chat::{BatchDelivery, ChatTarget, ConversationId, MessageId, ProgressReporter},
    fetcher::{FetchResponse, PageFetcher},
};
pub use types::{
    candidate::{CandidateUrl, TimeSlot},
    config::{FinderConfig, GridConfig, DEFAULT_BASE_URL, DEFAULT_DENYLIST},
    query::Query,
    verdict::{ProbeVerdict, RunReport},
};

// Re-export pipeline components
pub use pipeline::{
    classify, progress_text, stagger_delay, summary_text, DeliveryOutcome, Finder,
    ProbeScheduler, ProbeWorker, ResultAggregator, SCANNING_TEXT,
};

// Re-export fetchers
pub use fetchers::{FetcherExt, HttpFetcher, RateLimitedFetcher};

// Re-export testing utilities
pub use testing::{ChatEvent, MockFetcher, RecordingChat};
