use super::types::{mean, sample_std, Edge, Projection};
use crate::config::ProjectionConfig;
use crate::feed::types::{GameLog, StatCategory};

/// Half-width used when a player's spread can't be measured.
pub const DEFAULT_SPREAD: f64 = 2.0;

const RECENT_WEIGHT: f64 = 0.5;
const MEDIUM_WEIGHT: f64 = 0.3;
const SEASON_WEIGHT: f64 = 0.2;

/// Averages over the recent window, the medium window, and every log we have.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAverages {
    pub recent: f64,
    pub medium: f64,
    pub season: f64,
}

pub fn window_averages(
    logs: &[GameLog],
    category: StatCategory,
    cfg: &ProjectionConfig,
) -> Option<WindowAverages> {
    let values: Vec<f64> = logs.iter().map(|g| g.stat(category)).collect();
    let window = |n: usize| mean(&values[..n.min(values.len())]);
    Some(WindowAverages {
        recent: window(cfg.recent_window)?,
        medium: window(cfg.medium_window)?,
        season: mean(&values)?,
    })
}

/// Upward nudge from strong edges: every edge above 0.5 adds (s - 0.5) * 2,
/// and the total is held within [-2, 4].
pub fn edge_adjustment(edges: &[Edge]) -> f64 {
    edges
        .iter()
        .filter(|e| e.strength() > 0.5)
        .map(|e| (e.strength() - 0.5) * 2.0)
        .sum::<f64>()
        .clamp(-2.0, 4.0)
}

/// Project a stat range for one prop. Without history the range is
/// centred on the line itself.
pub fn project(
    line: f64,
    category: StatCategory,
    logs: &[GameLog],
    edges: &[Edge],
    cfg: &ProjectionConfig,
) -> Projection {
    let Some(avg) = window_averages(logs, category, cfg) else {
        return Projection {
            low: line - DEFAULT_SPREAD,
            high: line + DEFAULT_SPREAD,
        };
    };

    let baseline =
        avg.recent * RECENT_WEIGHT + avg.medium * MEDIUM_WEIGHT + avg.season * SEASON_WEIGHT;
    let center = baseline + edge_adjustment(edges);

    let spread_window: Vec<f64> = logs
        .iter()
        .take(cfg.medium_window)
        .map(|g| g.stat(category))
        .collect();
    let spread = sample_std(&spread_window).unwrap_or(DEFAULT_SPREAD);

    Projection {
        low: center - spread,
        high: center + spread,
    }
}
