use feed_core::{DataType, LeagueScope, SourceId};
use serde::Serialize;
use std::fmt;

/// Identifies one cached payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CacheKey {
    pub source: SourceId,
    pub data_type: DataType,
    pub league: LeagueScope,
}

impl CacheKey {
    pub fn new(source: SourceId, data_type: DataType, league: LeagueScope) -> Self {
        Self { source, data_type, league }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.data_type, self.league)
    }
}
