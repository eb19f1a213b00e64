//! Feed Cache
//!
//! In-memory store of the most recent successful payload per
//! (source, data type, league) key. Failed refreshes only touch the attempt
//! metadata, so readers keep getting the last good data while an upstream is
//! down, and the health snapshot tells them how old it is.

pub mod entry;
pub mod health;
pub mod key;
pub mod store;

pub use entry::{CacheEntry, CacheUpdate};
pub use health::HealthEntry;
pub use key::CacheKey;
pub use store::CacheStore;

/// TTL applied to keys written without being registered first
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

/// An entry is stale once its age exceeds this many TTLs
pub const STALE_TTL_MULTIPLIER: u32 = 2;
