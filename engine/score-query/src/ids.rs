//! Parsing of provider-scoped identifiers from request parameters
//!
//! Match and team ids are only meaningful inside the ID-space of the
//! provider that issued them, so a lookup always names its provider.

use feed_core::{MatchRef, SourceId, TeamRef};

use crate::error::{QueryError, QueryResult};

/// Parse a provider name; absent or unknown providers are rejected
pub fn parse_source(source: Option<&str>) -> QueryResult<SourceId> {
    let source = source.ok_or_else(|| {
        QueryError::UnknownIdentifierScope("identifier given without a source".to_string())
    })?;
    source.parse().map_err(QueryError::UnknownIdentifierScope)
}

fn parse_id(id: &str) -> QueryResult<i64> {
    id.trim()
        .parse()
        .map_err(|_| QueryError::InvalidQuery(format!("'{id}' is not a numeric identifier")))
}

pub fn parse_match_ref(id: &str, source: Option<&str>) -> QueryResult<MatchRef> {
    Ok(MatchRef { id: parse_id(id)?, source: parse_source(source)? })
}

pub fn parse_team_ref(id: &str, source: Option<&str>) -> QueryResult<TeamRef> {
    Ok(TeamRef { id: parse_id(id)?, source: parse_source(source)? })
}
