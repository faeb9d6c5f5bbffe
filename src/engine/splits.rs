use super::types::{mean, PropAnalysis, SplitSummary};
use crate::feed::types::{GameLog, StatCategory};
use std::collections::BTreeMap;

pub const HOME: &str = "home";
pub const AWAY: &str = "away";
pub const VS_OPPONENT: &str = "vs_opponent";

fn summarize<'a>(logs: impl Iterator<Item = &'a GameLog>, category: StatCategory) -> Option<SplitSummary> {
    let values: Vec<f64> = logs.map(|g| g.stat(category)).collect();
    Some(SplitSummary {
        games: values.len(),
        avg: mean(&values)?,
    })
}

/// Home, away, and head-to-head averages for `category`. Splits with no
/// games are omitted.
pub fn contextual_splits(
    logs: &[GameLog],
    category: StatCategory,
    opponent_abbr: &str,
) -> BTreeMap<String, SplitSummary> {
    let mut splits = BTreeMap::new();
    if let Some(s) = summarize(logs.iter().filter(|g| g.is_home), category) {
        splits.insert(HOME.to_string(), s);
    }
    if let Some(s) = summarize(logs.iter().filter(|g| !g.is_home), category) {
        splits.insert(AWAY.to_string(), s);
    }
    if let Some(s) = summarize(logs.iter().filter(|g| g.opponent_abbr == opponent_abbr), category) {
        splits.insert(VS_OPPONENT.to_string(), s);
    }
    splits
}

pub fn enrich(analysis: &mut PropAnalysis) {
    analysis.splits = contextual_splits(
        &analysis.game_logs,
        analysis.prop.category,
        &analysis.opponent_abbr,
    );
}
