use super::teams::normalize_player_name;
use super::types::*;
use super::{
    GameProvider, InjuryProvider, OddsProvider, PlayerStatsProvider, ScheduleProvider,
    TeamDefenseProvider,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

/// Everything the engine reads for one slate, frozen at collection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub date: NaiveDate,
    pub games: Vec<Game>,
    #[serde(default)]
    pub players: Vec<Player>,
    /// Most recent first.
    #[serde(default)]
    pub game_logs: BTreeMap<PlayerId, Vec<GameLog>>,
    #[serde(default)]
    pub team_defense: BTreeMap<String, TeamDefenseStats>,
    #[serde(default)]
    pub injuries: BTreeMap<String, Vec<Injury>>,
    #[serde(default)]
    pub schedules: BTreeMap<String, ScheduleContext>,
    #[serde(default)]
    pub props: Vec<Prop>,
}

impl SignalSnapshot {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            games: Vec::new(),
            players: Vec::new(),
            game_logs: BTreeMap::new(),
            team_defense: BTreeMap::new(),
            injuries: BTreeMap::new(),
            schedules: BTreeMap::new(),
            props: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot JSON: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))
    }

    pub fn game_for_team(&self, team_abbr: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.involves(team_abbr))
    }

    pub fn playing_teams(&self) -> BTreeSet<&str> {
        self.games
            .iter()
            .flat_map(|g| [g.home_team_abbr.as_str(), g.away_team_abbr.as_str()])
            .collect()
    }

    /// Exact name first, then the normalized key, so a book's "Nikola Jokic"
    /// finds the roster's "Nikola Jokić".
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name).or_else(|| {
            let key = normalize_player_name(name);
            self.players
                .iter()
                .find(|p| normalize_player_name(&p.name) == key)
        })
    }

    pub fn player_by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn logs_for(&self, player_id: PlayerId) -> &[GameLog] {
        self.game_logs
            .get(&player_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Serves a frozen snapshot through every provider trait, so a saved
/// slate can be replayed through the same collection path as live data.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: Arc<SignalSnapshot>,
}

impl SnapshotProvider {
    pub fn new(snapshot: SignalSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }
}

#[async_trait]
impl GameProvider for SnapshotProvider {
    async fn todays_games(&self, date: NaiveDate) -> Result<Vec<Game>> {
        Ok(self
            .snapshot
            .games
            .iter()
            .filter(|g| g.date == date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PlayerStatsProvider for SnapshotProvider {
    async fn league_players(&self) -> Result<Vec<Player>> {
        Ok(self.snapshot.players.clone())
    }

    async fn recent_games(&self, player_id: PlayerId, windows: &[usize]) -> Result<Vec<GameLog>> {
        let logs = self.snapshot.logs_for(player_id);
        let take = windows.iter().copied().max().unwrap_or(logs.len());
        Ok(logs.iter().take(take).cloned().collect())
    }
}

#[async_trait]
impl TeamDefenseProvider for SnapshotProvider {
    async fn defensive_stats(
        &self,
        team_abbr: &str,
        _last_n: usize,
    ) -> Result<Option<TeamDefenseStats>> {
        Ok(self.snapshot.team_defense.get(team_abbr).cloned())
    }
}

#[async_trait]
impl InjuryProvider for SnapshotProvider {
    async fn report(&self) -> Result<BTreeMap<String, Vec<Injury>>> {
        Ok(self.snapshot.injuries.clone())
    }
}

#[async_trait]
impl ScheduleProvider for SnapshotProvider {
    async fn context(
        &self,
        team_abbr: &str,
        _opponent_abbr: &str,
        _date: NaiveDate,
    ) -> Result<Option<ScheduleContext>> {
        Ok(self.snapshot.schedules.get(team_abbr).cloned())
    }
}

#[async_trait]
impl OddsProvider for SnapshotProvider {
    async fn props_for_games(&mut self, games: &[Game]) -> Result<Vec<Prop>> {
        let ids: BTreeSet<&str> = games.iter().map(|g| g.id.as_str()).collect();
        Ok(self
            .snapshot
            .props
            .iter()
            .filter(|p| ids.contains(p.game_id.as_str()))
            .cloned()
            .collect())
    }
}
