//! Upstream provider and data-type identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream provider. Identifiers issued by one provider are only valid
/// inside that provider's ID-space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    /// football-data.org: fixtures, standings and scorers for European leagues
    FootballData,
    /// SofaScore: live scores, plus fixtures for leagues football-data.org lacks
    Sofascore,
    /// fixturedownload.com: fixtures for the Indian leagues
    Fixturedownload,
}

impl SourceId {
    pub const ALL: [SourceId; 3] =
        [SourceId::FootballData, SourceId::Sofascore, SourceId::Fixturedownload];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::FootballData => "football-data",
            SourceId::Sofascore => "sofascore",
            SourceId::Fixturedownload => "fixturedownload",
        }
    }

    /// Whether this provider publishes `data_type` at all
    pub fn serves(&self, data_type: DataType) -> bool {
        match self {
            SourceId::FootballData => !matches!(data_type, DataType::Live),
            SourceId::Sofascore => !matches!(data_type, DataType::Scorers),
            SourceId::Fixturedownload => matches!(data_type, DataType::Fixtures),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "football-data" | "fd" => Ok(SourceId::FootballData),
            "sofascore" | "ss" => Ok(SourceId::Sofascore),
            "fixturedownload" | "fdl" => Ok(SourceId::Fixturedownload),
            other => Err(format!("unknown source '{other}'")),
        }
    }
}

/// Kind of payload a cache entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    Fixtures,
    Standings,
    Scorers,
    Live,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Fixtures => "fixtures",
            DataType::Standings => "standings",
            DataType::Scorers => "scorers",
            DataType::Live => "live",
        }
    }

    /// Whether an empty record list is a legitimate result for this data type.
    ///
    /// Nothing being in play is normal for live scores; an empty fixture list
    /// or table means the upstream broke.
    pub fn empty_is_expected(&self) -> bool {
        matches!(self, DataType::Live)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixtures" => Ok(DataType::Fixtures),
            "standings" => Ok(DataType::Standings),
            "scorers" => Ok(DataType::Scorers),
            "live" => Ok(DataType::Live),
            other => Err(format!("unknown data type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing_accepts_short_aliases() {
        assert_eq!("fd".parse::<SourceId>().unwrap(), SourceId::FootballData);
        assert_eq!("SofaScore".parse::<SourceId>().unwrap(), SourceId::Sofascore);
        assert_eq!("fixturedownload".parse::<SourceId>().unwrap(), SourceId::Fixturedownload);
        assert!("espn".parse::<SourceId>().is_err());
    }

    #[test]
    fn test_only_live_allows_empty() {
        assert!(DataType::Live.empty_is_expected());
        assert!(!DataType::Fixtures.empty_is_expected());
        assert!(!DataType::Standings.empty_is_expected());
        assert!(!DataType::Scorers.empty_is_expected());
    }

    #[test]
    fn test_provider_coverage() {
        assert!(SourceId::Sofascore.serves(DataType::Live));
        assert!(!SourceId::FootballData.serves(DataType::Live));
        assert!(SourceId::FootballData.serves(DataType::Scorers));
        assert!(SourceId::Fixturedownload.serves(DataType::Fixtures));
        assert!(!SourceId::Fixturedownload.serves(DataType::Standings));
        assert_eq!("Standings".parse::<DataType>().unwrap(), DataType::Standings);
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        assert_eq!(serde_json::to_string(&SourceId::FootballData).unwrap(), "\"football-data\"");
        assert_eq!(serde_json::to_string(&DataType::Live).unwrap(), "\"live\"");
    }
}
