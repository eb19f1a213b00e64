//! League catalog
//!
//! The set of competitions is closed: every cache key and every query is
//! scoped to one of these slugs, and anything else is rejected before a fetch
//! or a read happens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownLeagueError;
use crate::source::SourceId;

/// One competition the engine tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeagueScope {
    PremierLeague,
    LaLiga,
    Bundesliga,
    SerieA,
    #[serde(rename = "ligue-1")]
    Ligue1,
    ChampionsLeague,
    EuropaLeague,
    ConferenceLeague,
    FifaWorldCup,
    Isl,
    Ifl,
    Afc,
}

/// Where a league can be watched in the Indian region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streaming {
    pub platform: &'static str,
    pub app: &'static str,
}

/// Static catalog data for a league
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeagueInfo {
    pub slug: &'static str,
    pub name: &'static str,
    pub short: &'static str,
    pub country: &'static str,
    pub logo_url: &'static str,
    pub streaming: Streaming,
    /// Provider owning fixtures (and standings/scorers where published)
    pub fixtures_source: SourceId,
    /// Provider for in-play scores, if any
    pub live_source: Option<SourceId>,
    pub football_data_code: Option<&'static str>,
    pub sofascore_tournament_id: Option<u32>,
    pub fixturedownload_feed: Option<&'static str>,
}

const HOTSTAR: Streaming = Streaming { platform: "Disney+ Hotstar", app: "Hotstar" };
const SONY_LIV: Streaming = Streaming { platform: "Sony LIV", app: "SonyLIV" };
const JIO_CINEMA: Streaming = Streaming { platform: "JioCinema", app: "JioCinema" };
const FANCODE: Streaming = Streaming { platform: "FanCode", app: "FanCode" };

const fn football_data(
    slug: &'static str,
    name: &'static str,
    short: &'static str,
    country: &'static str,
    logo_url: &'static str,
    streaming: Streaming,
    code: &'static str,
    tournament_id: u32,
) -> LeagueInfo {
    LeagueInfo {
        slug,
        name,
        short,
        country,
        logo_url,
        streaming,
        fixtures_source: SourceId::FootballData,
        live_source: Some(SourceId::Sofascore),
        football_data_code: Some(code),
        sofascore_tournament_id: Some(tournament_id),
        fixturedownload_feed: None,
    }
}

static PREMIER_LEAGUE: LeagueInfo = football_data(
    "premier-league",
    "Premier League",
    "EPL",
    "England",
    "https://crests.football-data.org/PL.png",
    HOTSTAR,
    "PL",
    17,
);
static LA_LIGA: LeagueInfo = football_data(
    "la-liga",
    "La Liga",
    "LaLiga",
    "Spain",
    "https://crests.football-data.org/PD.png",
    SONY_LIV,
    "PD",
    8,
);
static BUNDESLIGA: LeagueInfo = football_data(
    "bundesliga",
    "Bundesliga",
    "Bundes",
    "Germany",
    "https://crests.football-data.org/BL1.png",
    SONY_LIV,
    "BL1",
    35,
);
static SERIE_A: LeagueInfo = football_data(
    "serie-a",
    "Serie A",
    "SerieA",
    "Italy",
    "https://crests.football-data.org/SA.png",
    SONY_LIV,
    "SA",
    23,
);
static LIGUE_1: LeagueInfo = football_data(
    "ligue-1",
    "Ligue 1",
    "Ligue1",
    "France",
    "https://crests.football-data.org/FL1.png",
    SONY_LIV,
    "FL1",
    34,
);
static CHAMPIONS_LEAGUE: LeagueInfo = football_data(
    "champions-league",
    "UEFA Champions League",
    "UCL",
    "Europe",
    "https://crests.football-data.org/CL.png",
    SONY_LIV,
    "CL",
    7,
);
static EUROPA_LEAGUE: LeagueInfo = football_data(
    "europa-league",
    "UEFA Europa League",
    "UEL",
    "Europe",
    "https://crests.football-data.org/EL.png",
    SONY_LIV,
    "EL",
    679,
);
static FIFA_WORLD_CUP: LeagueInfo = football_data(
    "fifa-world-cup",
    "FIFA World Cup 2026",
    "WC26",
    "World",
    "https://crests.football-data.org/WC.png",
    HOTSTAR,
    "WC",
    16,
);
static CONFERENCE_LEAGUE: LeagueInfo = LeagueInfo {
    slug: "conference-league",
    name: "UEFA Conference League",
    short: "UECL",
    country: "Europe",
    logo_url: "https://upload.wikimedia.org/wikipedia/en/f/f3/UEFA_Europa_Conference_League_logo.svg",
    streaming: SONY_LIV,
    fixtures_source: SourceId::Sofascore,
    live_source: Some(SourceId::Sofascore),
    football_data_code: None,
    sofascore_tournament_id: Some(17015),
    fixturedownload_feed: None,
};
static AFC: LeagueInfo = LeagueInfo {
    slug: "afc",
    name: "AFC Champions League Elite",
    short: "ACLE",
    country: "Asia",
    logo_url: "https://upload.wikimedia.org/wikipedia/en/b/b5/AFC_Champions_League_logo.svg",
    streaming: SONY_LIV,
    fixtures_source: SourceId::Sofascore,
    live_source: Some(SourceId::Sofascore),
    football_data_code: None,
    sofascore_tournament_id: Some(329),
    fixturedownload_feed: None,
};
static ISL: LeagueInfo = LeagueInfo {
    slug: "isl",
    name: "Indian Super League",
    short: "ISL",
    country: "India",
    logo_url: "https://upload.wikimedia.org/wikipedia/en/0/04/Indian_Super_League_logo.svg",
    streaming: JIO_CINEMA,
    fixtures_source: SourceId::Fixturedownload,
    live_source: None,
    football_data_code: None,
    sofascore_tournament_id: None,
    fixturedownload_feed: Some("isl-2024"),
};
static IFL: LeagueInfo = LeagueInfo {
    slug: "ifl",
    name: "Indian Football League",
    short: "IFL",
    country: "India",
    logo_url: "https://upload.wikimedia.org/wikipedia/en/3/35/I-League_logo.png",
    streaming: FANCODE,
    fixtures_source: SourceId::Fixturedownload,
    live_source: None,
    football_data_code: None,
    sofascore_tournament_id: None,
    fixturedownload_feed: Some("i-league-2024"),
};

impl LeagueScope {
    /// Every scope, in catalog order
    pub const ALL: [LeagueScope; 12] = [
        LeagueScope::PremierLeague,
        LeagueScope::LaLiga,
        LeagueScope::Bundesliga,
        LeagueScope::SerieA,
        LeagueScope::Ligue1,
        LeagueScope::ChampionsLeague,
        LeagueScope::EuropaLeague,
        LeagueScope::ConferenceLeague,
        LeagueScope::FifaWorldCup,
        LeagueScope::Isl,
        LeagueScope::Ifl,
        LeagueScope::Afc,
    ];

    pub fn info(&self) -> &'static LeagueInfo {
        match self {
            LeagueScope::PremierLeague => &PREMIER_LEAGUE,
            LeagueScope::LaLiga => &LA_LIGA,
            LeagueScope::Bundesliga => &BUNDESLIGA,
            LeagueScope::SerieA => &SERIE_A,
            LeagueScope::Ligue1 => &LIGUE_1,
            LeagueScope::ChampionsLeague => &CHAMPIONS_LEAGUE,
            LeagueScope::EuropaLeague => &EUROPA_LEAGUE,
            LeagueScope::ConferenceLeague => &CONFERENCE_LEAGUE,
            LeagueScope::FifaWorldCup => &FIFA_WORLD_CUP,
            LeagueScope::Isl => &ISL,
            LeagueScope::Ifl => &IFL,
            LeagueScope::Afc => &AFC,
        }
    }

    pub fn slug(&self) -> &'static str {
        self.info().slug
    }

    pub fn fixtures_source(&self) -> SourceId {
        self.info().fixtures_source
    }

    pub fn live_source(&self) -> Option<SourceId> {
        self.info().live_source
    }

    /// Scopes whose fixtures are owned by `source`
    pub fn with_fixtures_from(source: SourceId) -> Vec<LeagueScope> {
        Self::ALL.iter().copied().filter(|scope| scope.fixtures_source() == source).collect()
    }

    /// Scopes that have an in-play feed from `source`
    pub fn with_live_from(source: SourceId) -> Vec<LeagueScope> {
        Self::ALL.iter().copied().filter(|scope| scope.live_source() == Some(source)).collect()
    }
}

impl fmt::Display for LeagueScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for LeagueScope {
    type Err = UnknownLeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|scope| scope.slug() == s)
            .ok_or_else(|| UnknownLeagueError(s.to_string()))
    }
}
