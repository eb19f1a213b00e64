//! Error types for the query layer

use feed_core::{MatchRef, UnknownLeagueError};
use thiserror::Error;

/// Errors a query can surface to an API consumer
///
/// A cache miss is never an error; it reads as an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("League '{0}' not found")]
    UnknownLeague(String),

    #[error("Identifier scope error: {0}")]
    UnknownIdentifierScope(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Match {} not found for {}", .0.id, .0.source)]
    MatchNotFound(MatchRef),
}

impl QueryError {
    /// HTTP-style status a front end should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::UnknownLeague(_) | QueryError::MatchNotFound(_) => 404,
            QueryError::UnknownIdentifierScope(_) | QueryError::InvalidQuery(_) => 400,
        }
    }
}

impl From<UnknownLeagueError> for QueryError {
    fn from(err: UnknownLeagueError) -> Self {
        QueryError::UnknownLeague(err.0)
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
