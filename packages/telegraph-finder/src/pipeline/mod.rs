//! Probe pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Probing (one GET per candidate, classified against the denylist)
//! - Scheduling (month → day → index fan-out, launch-timed progress)
//! - Aggregation (completion barrier, chunked delivery, closing count)

pub mod aggregate;
pub mod probe;
pub mod run;
pub mod schedule;

pub use aggregate::{summary_text, DeliveryOutcome, ResultAggregator};
pub use probe::{classify, ProbeWorker};
pub use run::Finder;
pub use schedule::{progress_text, stagger_delay, ProbeScheduler, SCANNING_TEXT};
