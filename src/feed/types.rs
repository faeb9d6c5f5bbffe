use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized internal types used by the engine (provider-agnostic).

pub type PlayerId = u64;

/// Team abbreviation used when a book does not tell us the player's team.
pub const UNKNOWN_TEAM: &str = "UNK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    Points,
    Rebounds,
    Assists,
    Threes,
    PtsRebsAsts,
    PtsAsts,
    PtsRebs,
    RebsAsts,
    DoubleDouble,
}

impl StatCategory {
    pub const ALL: [StatCategory; 9] = [
        StatCategory::Points,
        StatCategory::Rebounds,
        StatCategory::Assists,
        StatCategory::Threes,
        StatCategory::PtsRebsAsts,
        StatCategory::PtsAsts,
        StatCategory::PtsRebs,
        StatCategory::RebsAsts,
        StatCategory::DoubleDouble,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatCategory::Points => "points",
            StatCategory::Rebounds => "rebounds",
            StatCategory::Assists => "assists",
            StatCategory::Threes => "threes",
            StatCategory::PtsRebsAsts => "pts_rebs_asts",
            StatCategory::PtsAsts => "pts_asts",
            StatCategory::PtsRebs => "pts_rebs",
            StatCategory::RebsAsts => "rebs_asts",
            StatCategory::DoubleDouble => "double_double",
        }
    }

    /// Short label for rendered picks.
    pub fn label(self) -> &'static str {
        match self {
            StatCategory::Points => "Points",
            StatCategory::Rebounds => "Rebounds",
            StatCategory::Assists => "Assists",
            StatCategory::Threes => "Threes",
            StatCategory::PtsRebsAsts => "PRA",
            StatCategory::PtsAsts => "Pts+Asts",
            StatCategory::PtsRebs => "Pts+Rebs",
            StatCategory::RebsAsts => "Rebs+Asts",
            StatCategory::DoubleDouble => "Double-Double",
        }
    }

    /// Simple categories a compound market is built from. Simple
    /// categories return themselves; a double-double is driven by the
    /// three counting stats.
    pub fn components(self) -> &'static [StatCategory] {
        match self {
            StatCategory::PtsRebsAsts | StatCategory::DoubleDouble => &[
                StatCategory::Points,
                StatCategory::Rebounds,
                StatCategory::Assists,
            ],
            StatCategory::PtsAsts => &[StatCategory::Points, StatCategory::Assists],
            StatCategory::PtsRebs => &[StatCategory::Points, StatCategory::Rebounds],
            StatCategory::RebsAsts => &[StatCategory::Rebounds, StatCategory::Assists],
            StatCategory::Points => &[StatCategory::Points],
            StatCategory::Rebounds => &[StatCategory::Rebounds],
            StatCategory::Assists => &[StatCategory::Assists],
            StatCategory::Threes => &[StatCategory::Threes],
        }
    }

    /// Parse a category from the names books and feeds use.
    /// Accepts the canonical snake_case name, common aliases, and
    /// the-odds-api market keys (`player_points_rebounds_assists`).
    pub fn parse(raw: &str) -> Option<Self> {
        let norm = raw.trim().to_lowercase().replace([' ', '-'], "_");
        let norm = norm.strip_prefix("player_").unwrap_or(&norm);
        let cat = match norm {
            "points" | "pts" => StatCategory::Points,
            "rebounds" | "rebs" | "total_rebounds" => StatCategory::Rebounds,
            "assists" | "asts" => StatCategory::Assists,
            "threes" | "3pm" | "fg3m" | "three_pointers_made" => StatCategory::Threes,
            "pts_rebs_asts" | "pra" | "pts+rebs+asts" | "points_rebounds_assists" => {
                StatCategory::PtsRebsAsts
            }
            "pts_asts" | "pa" | "pts+asts" | "points_assists" => StatCategory::PtsAsts,
            "pts_rebs" | "pr" | "pts+rebs" | "points_rebounds" => StatCategory::PtsRebs,
            "rebs_asts" | "ra" | "rebs+asts" | "rebounds_assists" => StatCategory::RebsAsts,
            "double_double" | "dd" => StatCategory::DoubleDouble,
            _ => return None,
        };
        Some(cat)
    }
}

impl std::fmt::Display for StatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub date: NaiveDate,
    pub home_team_abbr: String,
    pub away_team_abbr: String,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub spread: Option<f64>,
}

impl Game {
    pub fn involves(&self, team_abbr: &str) -> bool {
        self.home_team_abbr == team_abbr || self.away_team_abbr == team_abbr
    }

    pub fn opponent_of(&self, team_abbr: &str) -> Option<&str> {
        if self.home_team_abbr == team_abbr {
            Some(&self.away_team_abbr)
        } else if self.away_team_abbr == team_abbr {
            Some(&self.home_team_abbr)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_abbr: String,
    /// "G", "F-C", ... as listed by the league.
    #[serde(default)]
    pub position: String,
}

/// One box-score line. Providers return these most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub game_id: String,
    pub game_date: NaiveDate,
    pub opponent_abbr: String,
    pub is_home: bool,
    pub minutes: f64,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub fg3m: u32,
    pub fga: u32,
    #[serde(default)]
    pub steals: u32,
    #[serde(default)]
    pub blocks: u32,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub team_won: bool,
}

impl GameLog {
    pub fn has_double_double(&self) -> bool {
        [self.points, self.rebounds, self.assists, self.steals, self.blocks]
            .iter()
            .filter(|&&s| s >= 10)
            .count()
            >= 2
    }

    /// Value of `category` in this game. Double-doubles count as 1.0 / 0.0.
    pub fn stat(&self, category: StatCategory) -> f64 {
        let v = match category {
            StatCategory::Points => self.points,
            StatCategory::Rebounds => self.rebounds,
            StatCategory::Assists => self.assists,
            StatCategory::Threes => self.fg3m,
            StatCategory::PtsRebsAsts => self.points + self.rebounds + self.assists,
            StatCategory::PtsAsts => self.points + self.assists,
            StatCategory::PtsRebs => self.points + self.rebounds,
            StatCategory::RebsAsts => self.rebounds + self.assists,
            StatCategory::DoubleDouble => u32::from(self.has_double_double()),
        };
        v as f64
    }
}

/// Per-team defensive profile. Ranks run 1 (best) to 30 (worst).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDefenseStats {
    pub team_abbr: String,
    pub pts_allowed: f64,
    pub reb_allowed: f64,
    pub ast_allowed: f64,
    pub fg3m_allowed: f64,
    pub pts_rank: u8,
    pub reb_rank: u8,
    pub ast_rank: u8,
    pub fg3m_rank: u8,
    /// Possessions per 48 minutes, when the provider has it.
    #[serde(default)]
    pub pace: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryStatus {
    Out,
    Doubtful,
    Questionable,
    Probable,
    Available,
    DayToDay,
}

impl InjuryStatus {
    /// Statuses that remove the player from tonight's rotation.
    pub fn is_sidelined(self) -> bool {
        matches!(self, InjuryStatus::Out | InjuryStatus::Doubtful)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InjuryStatus::Out => "out",
            InjuryStatus::Doubtful => "doubtful",
            InjuryStatus::Questionable => "questionable",
            InjuryStatus::Probable => "probable",
            InjuryStatus::Available => "available",
            InjuryStatus::DayToDay => "day_to_day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    pub player_name: String,
    pub team_abbr: String,
    pub status: InjuryStatus,
    #[serde(default)]
    pub injury_type: String,
    #[serde(default)]
    pub usage_rate: f64,
    #[serde(default)]
    pub minutes_per_game: f64,
    /// Free-text role/injury notes from the report.
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleContext {
    pub team_abbr: String,
    pub days_rest: i32,
    pub is_back_to_back: bool,
    pub games_in_last_7_days: u32,
    pub is_home: bool,
    #[serde(default)]
    pub travel_miles: f64,
    pub opponent_days_rest: i32,
    pub opponent_is_b2b: bool,
    /// Positive when this team is more rested than its opponent.
    pub rest_advantage: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Over,
    Under,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Over => "over",
            Direction::Under => "under",
        }
    }
}

/// A single sportsbook offering, snapshotted at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    pub player_name: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub game_id: String,
    pub category: StatCategory,
    pub line: f64,
    pub over_price: i32,  // American odds
    pub under_price: i32, // American odds
    pub book: String,
    #[serde(default)]
    pub is_home: bool,
}

impl Prop {
    pub fn price_for(&self, direction: Direction) -> i32 {
        match direction {
            Direction::Over => self.over_price,
            Direction::Under => self.under_price,
        }
    }

    pub fn has_known_team(&self) -> bool {
        !self.team_abbr.is_empty() && self.team_abbr != UNKNOWN_TEAM
    }
}

/// the-odds-api.com v4 event list entry (`/v4/sports/{sport}/events`).
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct TheOddsApiEvent {
    pub id: String,
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: String,
    #[serde(default)]
    pub bookmakers: Vec<TheOddsApiBookmaker>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct TheOddsApiBookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub last_update: String,
    pub markets: Vec<TheOddsApiMarket>,
}

#[derive(Debug, Deserialize)]
pub struct TheOddsApiMarket {
    pub key: String,
    pub outcomes: Vec<TheOddsApiOutcome>,
}

/// Player-prop outcome: `name` is "Over"/"Under", `description` the player.
#[derive(Debug, Deserialize)]
pub struct TheOddsApiOutcome {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub point: Option<f64>,
}

/// API usage quota info extracted from response headers.
#[derive(Debug, Clone, Default)]
pub struct ApiQuota {
    pub requests_used: u64,
    pub requests_remaining: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(points: u32, rebounds: u32, assists: u32) -> GameLog {
        GameLog {
            game_id: "g".to_string(),
            game_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            opponent_abbr: "BOS".to_string(),
            is_home: true,
            minutes: 32.0,
            points,
            rebounds,
            assists,
            fg3m: 2,
            fga: 15,
            steals: 1,
            blocks: 0,
            started: true,
            team_won: false,
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(StatCategory::parse("pra"), Some(StatCategory::PtsRebsAsts));
        assert_eq!(
            StatCategory::parse("player_points_rebounds_assists"),
            Some(StatCategory::PtsRebsAsts)
        );
        assert_eq!(StatCategory::parse("Player Threes"), Some(StatCategory::Threes));
        assert_eq!(StatCategory::parse("3pm"), Some(StatCategory::Threes));
        assert_eq!(StatCategory::parse("dd"), Some(StatCategory::DoubleDouble));
        assert_eq!(StatCategory::parse("player_blocks"), None);
    }

    #[test]
    fn test_components() {
        assert_eq!(
            StatCategory::PtsAsts.components(),
            &[StatCategory::Points, StatCategory::Assists]
        );
        assert_eq!(StatCategory::PtsRebsAsts.components().len(), 3);
        assert_eq!(StatCategory::Rebounds.components(), &[StatCategory::Rebounds]);
        assert_eq!(StatCategory::DoubleDouble.components().len(), 3);
    }

    #[test]
    fn test_game_log_stats() {
        let g = log(20, 11, 4);
        assert_eq!(g.stat(StatCategory::PtsRebsAsts), 35.0);
        assert_eq!(g.stat(StatCategory::RebsAsts), 15.0);
        assert_eq!(g.stat(StatCategory::DoubleDouble), 1.0);
        assert_eq!(log(20, 9, 4).stat(StatCategory::DoubleDouble), 0.0);
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&StatCategory::PtsRebs).unwrap();
        assert_eq!(json, "\"pts_rebs\"");
    }

    #[test]
    fn test_game_opponent() {
        let game = Game {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            home_team_abbr: "LAL".to_string(),
            away_team_abbr: "BOS".to_string(),
            total: None,
            spread: None,
        };
        assert_eq!(game.opponent_of("LAL"), Some("BOS"));
        assert_eq!(game.opponent_of("BOS"), Some("LAL"));
        assert_eq!(game.opponent_of("MIA"), None);
    }
}
