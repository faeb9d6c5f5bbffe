use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::feed::types::{
    Direction, Game, GameLog, Player, PlayerId, Prop, ScheduleContext, StatCategory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Injury,
    Role,
    Scheme,
    Pace,
    Schedule,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Injury => "injury",
            EdgeKind::Role => "role",
            EdgeKind::Scheme => "scheme",
            EdgeKind::Pace => "pace",
            EdgeKind::Schedule => "schedule",
        }
    }
}

/// A quantified, explainable reason to expect a stat deviation.
///
/// Built once by a detector through the `with_*` / `for_*` builder calls and
/// read-only afterwards. Strength is clamped to [0, 1] when set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    kind: EdgeKind,
    description: String,
    affected_stats: BTreeSet<StatCategory>,
    strength: f64,
    supporting_data: BTreeMap<String, Value>,
    benefiting_player_ids: BTreeSet<PlayerId>,
    game_id: Option<String>,
    team_abbr: Option<String>,
    is_primary: bool,
}

impl Edge {
    pub fn new(kind: EdgeKind, description: impl Into<String>, strength: f64) -> Self {
        Self {
            kind,
            description: description.into(),
            affected_stats: BTreeSet::new(),
            strength: clamp_unit(strength),
            supporting_data: BTreeMap::new(),
            benefiting_player_ids: BTreeSet::new(),
            game_id: None,
            team_abbr: None,
            is_primary: true,
        }
    }

    pub fn with_stats(mut self, stats: impl IntoIterator<Item = StatCategory>) -> Self {
        self.affected_stats.extend(stats);
        self
    }

    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.supporting_data.insert(key.to_string(), value.into());
        self
    }

    pub fn for_game(mut self, game_id: &str) -> Self {
        self.game_id = Some(game_id.to_string());
        self
    }

    pub fn for_team(mut self, team_abbr: &str) -> Self {
        self.team_abbr = Some(team_abbr.to_string());
        self
    }

    pub fn for_player(mut self, player_id: PlayerId) -> Self {
        self.benefiting_player_ids.insert(player_id);
        self
    }

    /// Mark as a supporting signal rather than a primary one.
    pub fn secondary(mut self) -> Self {
        self.is_primary = false;
        self
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn affected_stats(&self) -> &BTreeSet<StatCategory> {
        &self.affected_stats
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn supporting_data(&self) -> &BTreeMap<String, Value> {
        &self.supporting_data
    }

    pub fn benefiting_player_ids(&self) -> &BTreeSet<PlayerId> {
        &self.benefiting_player_ids
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn team_abbr(&self) -> Option<&str> {
        self.team_abbr.as_deref()
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// True if this edge moves `category`: either directly, or through any
    /// component of a compound category.
    pub fn matches(&self, category: StatCategory) -> bool {
        self.affected_stats.contains(&category)
            || category
                .components()
                .iter()
                .any(|c| self.affected_stats.contains(c))
    }

    /// Edges with benefiting players only apply to those players.
    pub fn applies_to(&self, player_id: Option<PlayerId>) -> bool {
        if self.benefiting_player_ids.is_empty() {
            return true;
        }
        player_id.is_some_and(|id| self.benefiting_player_ids.contains(&id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub low: f64,
    pub high: f64,
}

impl Projection {
    pub fn mid(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn direction(&self, line: f64) -> Direction {
        if self.mid() > line {
            Direction::Over
        } else {
            Direction::Under
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitSummary {
    pub games: usize,
    pub avg: f64,
}

/// Sub-scores behind a confidence value. All fields are in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub edge_quality: f64,
    pub minutes_security: f64,
    pub sample_quality: f64,
    pub odds_value: f64,
    pub alignment: f64,
    pub confidence: f64,
}

/// One prop with everything the engine learned about it.
#[derive(Debug, Clone, Serialize)]
pub struct PropAnalysis {
    pub prop: Prop,
    pub player: Player,
    pub game: Game,
    pub opponent_abbr: String,
    edges: Vec<Edge>,
    /// Most recent first.
    pub game_logs: Vec<GameLog>,
    pub schedule: Option<ScheduleContext>,
    projection: Projection,
    direction: Direction,
    pub splits: BTreeMap<String, SplitSummary>,
    pub scores: ScoreBreakdown,
    risk_notes: Vec<String>,
    pub narrative: Option<String>,
}

impl PropAnalysis {
    /// Returns `None` when no edge matched; an analysis never exists without one.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prop: Prop,
        player: Player,
        game: Game,
        opponent_abbr: String,
        edges: Vec<Edge>,
        game_logs: Vec<GameLog>,
        schedule: Option<ScheduleContext>,
        projection: Projection,
    ) -> Option<Self> {
        if edges.is_empty() {
            return None;
        }
        let direction = projection.direction(prop.line);
        Some(Self {
            prop,
            player,
            game,
            opponent_abbr,
            edges,
            game_logs,
            schedule,
            projection,
            direction,
            splits: BTreeMap::new(),
            scores: ScoreBreakdown::default(),
            risk_notes: Vec::new(),
            narrative: None,
        })
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn projected_low(&self) -> f64 {
        self.projection.low
    }

    pub fn projected_high(&self) -> f64 {
        self.projection.high
    }

    pub fn projected_mid(&self) -> f64 {
        self.projection.mid()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn confidence(&self) -> f64 {
        self.scores.confidence
    }

    /// Price of the side we are recommending.
    pub fn price(&self) -> i32 {
        self.prop.price_for(self.direction)
    }

    pub fn risk_notes(&self) -> &[String] {
        &self.risk_notes
    }

    pub fn push_risk_note(&mut self, note: impl Into<String>) {
        self.risk_notes.push(note.into());
    }

    /// Values of the prop's category across the game-log window.
    pub fn stat_values(&self) -> Vec<f64> {
        self.game_logs
            .iter()
            .map(|g| g.stat(self.prop.category))
            .collect()
    }
}

pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1). `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}
