//! Page fetcher implementations.
//!
//! - `HttpFetcher` - reqwest GET with an optional per-request timeout
//! - `RateLimitedFetcher` - wrapper that adds a global request rate

pub mod http;
pub mod rate_limited;

pub use http::HttpFetcher;
pub use rate_limited::{FetcherExt, RateLimitedFetcher};
