//! Feed Core
//!
//! Shared vocabulary for the Goal2Gol feed engine: the closed set of league
//! scopes, provider and data-type identifiers, the normalized record model
//! every upstream is mapped into, the `SourceAdapter` contract and the clock
//! abstraction used by the scheduler and the query layer.

pub mod adapter;
pub mod clock;
pub mod error;
pub mod league;
pub mod records;
pub mod source;

pub use adapter::{verify_provenance, verify_scope, FetchOutcome, SourceAdapter};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AdapterError, UnknownLeagueError};
pub use league::{LeagueInfo, LeagueScope, Streaming};
pub use records::{
    Match, MatchRef, MatchStatus, NormalizedRecord, ScoreLine, ScorerRow, StandingsRow, TeamRef,
    TeamSide,
};
pub use source::{DataType, SourceId};

/// Timezone offset used for the prime-time window and kickoff display (IST, +05:30)
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;
