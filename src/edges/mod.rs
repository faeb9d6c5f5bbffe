//! Edge discovery: independent detectors that turn raw signals into
//! quantified [`Edge`]s. Detectors never read each other's output, and a
//! detector missing data for a game, team or player skips just that unit.

pub mod injury;
pub mod keywords;
pub mod pace;
pub mod role;
pub mod schedule;
pub mod scheme;

use crate::config::Config;
use crate::engine::types::Edge;
use crate::feed::snapshot::SignalSnapshot;
use crate::feed::types::StatCategory;

/// Every counting-stat market a broad opportunity edge touches.
pub const COUNTING_STATS: [StatCategory; 8] = [
    StatCategory::Points,
    StatCategory::Rebounds,
    StatCategory::Assists,
    StatCategory::Threes,
    StatCategory::PtsRebsAsts,
    StatCategory::PtsAsts,
    StatCategory::PtsRebs,
    StatCategory::RebsAsts,
];

/// Run every detector family over the snapshot and concatenate the results
/// in a fixed family order.
pub fn discover(snapshot: &SignalSnapshot, cfg: &Config) -> Vec<Edge> {
    let mut edges = Vec::new();
    edges.extend(injury::find_injury_edges(snapshot, &cfg.edges));
    edges.extend(role::find_role_edges(snapshot));
    edges.extend(scheme::find_scheme_edges(snapshot));
    edges.extend(scheme::find_positional_edges(snapshot));
    edges.extend(pace::find_pace_edges(snapshot));
    edges.extend(schedule::find_schedule_edges(snapshot));
    tracing::info!(total = edges.len(), "edge discovery complete");
    edges
}
