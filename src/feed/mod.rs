pub mod snapshot;
pub mod teams;
pub mod the_odds_api;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use types::{
    ApiQuota, Game, GameLog, Injury, Player, PlayerId, Prop, ScheduleContext, TeamDefenseStats,
};

#[async_trait]
pub trait GameProvider: Send + Sync {
    async fn todays_games(&self, date: NaiveDate) -> Result<Vec<Game>>;
}

#[async_trait]
pub trait PlayerStatsProvider: Send + Sync {
    async fn league_players(&self) -> Result<Vec<Player>>;

    /// Game logs, most recent first, covering at least the largest window
    /// when the player has that many games.
    async fn recent_games(&self, player_id: PlayerId, windows: &[usize]) -> Result<Vec<GameLog>>;
}

#[async_trait]
pub trait TeamDefenseProvider: Send + Sync {
    /// `Ok(None)` when the provider has no numbers for the team.
    async fn defensive_stats(&self, team_abbr: &str, last_n: usize)
        -> Result<Option<TeamDefenseStats>>;
}

#[async_trait]
pub trait InjuryProvider: Send + Sync {
    /// Current report keyed by team abbreviation.
    async fn report(&self) -> Result<BTreeMap<String, Vec<Injury>>>;
}

#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    async fn context(
        &self,
        team_abbr: &str,
        opponent_abbr: &str,
        date: NaiveDate,
    ) -> Result<Option<ScheduleContext>>;
}

#[async_trait]
pub trait OddsProvider: Send + Sync {
    async fn props_for_games(&mut self, games: &[Game]) -> Result<Vec<Prop>>;

    fn last_quota(&self) -> Option<ApiQuota> {
        None
    }
}
