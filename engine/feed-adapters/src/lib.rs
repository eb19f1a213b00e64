//! Feed Adapters
//!
//! `SourceAdapter` implementations for the upstream providers. Every provider
//! is reached through a normalized feed endpoint, so one HTTP adapter type
//! covers football-data.org, SofaScore and fixturedownload.com.

pub mod config;
pub mod http_feed;

pub use config::{FeedConfigError, FeedEndpoint, FeedsConfig};
pub use http_feed::{decode_feed, FeedStatus, HttpFeedAdapter};
