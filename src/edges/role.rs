use super::COUNTING_STATS;
use crate::engine::types::{mean, Edge, EdgeKind};
use crate::feed::snapshot::SignalSnapshot;
use crate::feed::types::{GameLog, Player, StatCategory};

/// Logs needed to compare the last five games with the five before them.
pub const ROLE_WINDOW: usize = 5;

const USAGE_STATS: [StatCategory; 5] = [
    StatCategory::Points,
    StatCategory::Threes,
    StatCategory::PtsRebsAsts,
    StatCategory::PtsAsts,
    StatCategory::PtsRebs,
];

/// Averages of one field over the recent and prior windows.
fn windows(logs: &[GameLog], field: impl Fn(&GameLog) -> f64) -> Option<(f64, f64)> {
    if logs.len() < ROLE_WINDOW * 2 {
        return None;
    }
    let recent: Vec<f64> = logs[..ROLE_WINDOW].iter().map(&field).collect();
    let prior: Vec<f64> = logs[ROLE_WINDOW..ROLE_WINDOW * 2].iter().map(&field).collect();
    Some((mean(&recent)?, mean(&prior)?))
}

pub fn find_role_edges(snapshot: &SignalSnapshot) -> Vec<Edge> {
    let teams = snapshot.playing_teams();
    let mut edges = Vec::new();

    for player in snapshot.players.iter().filter(|p| teams.contains(p.team_abbr.as_str())) {
        let logs = snapshot.logs_for(player.id);
        if logs.len() < ROLE_WINDOW * 2 {
            continue;
        }
        let game_id = snapshot.game_for_team(&player.team_abbr).map(|g| g.id.as_str());
        for edge in [
            usage_edge(player, logs),
            minutes_edge(player, logs),
            starter_edge(player, logs),
        ]
        .into_iter()
        .flatten()
        {
            edges.push(match game_id {
                Some(id) => edge.for_game(id),
                None => edge,
            });
        }
    }

    tracing::info!(count = edges.len(), "found role edges");
    edges
}

/// FGA up 20% or more, or scoring up three points or more.
pub fn usage_edge(player: &Player, logs: &[GameLog]) -> Option<Edge> {
    let (recent_fga, prior_fga) = windows(logs, |g| g.fga as f64)?;
    let (recent_pts, prior_pts) = windows(logs, |g| g.points as f64)?;

    let fga_pct = (recent_fga - prior_fga) / prior_fga.max(1.0) * 100.0;
    let pts_gain = recent_pts - prior_pts;
    if fga_pct < 20.0 && pts_gain < 3.0 {
        return None;
    }

    Some(
        Edge::new(
            EdgeKind::Role,
            format!(
                "{}'s usage trending up: {:.1} → {:.1} FGA, {:.1} → {:.1} PPG",
                player.name, prior_fga, recent_fga, prior_pts, recent_pts
            ),
            (0.3 + fga_pct / 100.0).clamp(0.0, 0.7),
        )
        .with_stats(USAGE_STATS)
        .with_data("edge_subtype", "usage_increase")
        .with_data("recent_fga", recent_fga)
        .with_data("previous_fga", prior_fga)
        .with_data("fga_increase_pct", fga_pct)
        .with_data("pts_increase", pts_gain)
        .for_player(player.id)
        .for_team(&player.team_abbr),
    )
}

/// Three or more extra minutes per game.
pub fn minutes_edge(player: &Player, logs: &[GameLog]) -> Option<Edge> {
    let (recent, prior) = windows(logs, |g| g.minutes)?;
    let gain = recent - prior;
    if gain < 3.0 {
        return None;
    }

    Some(
        Edge::new(
            EdgeKind::Role,
            format!(
                "{}'s minutes trending up: {:.1} → {:.1} MPG (+{:.1})",
                player.name, prior, recent, gain
            ),
            f64::min(0.3 + gain / 10.0, 0.6),
        )
        .with_stats(COUNTING_STATS)
        .with_data("edge_subtype", "minutes_increase")
        .with_data("recent_mins", recent)
        .with_data("previous_mins", prior)
        .for_player(player.id)
        .for_team(&player.team_abbr),
    )
}

/// Started at least 4 of the last 5 after starting at most 1 of the 5 before.
pub fn starter_edge(player: &Player, logs: &[GameLog]) -> Option<Edge> {
    let (recent, prior) = windows(logs, |g| if g.started { 1.0 } else { 0.0 })?;
    let recent_starts = (recent * ROLE_WINDOW as f64).round() as usize;
    let prior_starts = (prior * ROLE_WINDOW as f64).round() as usize;
    if recent_starts < 4 || prior_starts > 1 {
        return None;
    }

    Some(
        Edge::new(
            EdgeKind::Role,
            format!(
                "{} has moved into the starting lineup ({}/5 recent starts vs {}/5 before)",
                player.name, recent_starts, prior_starts
            ),
            0.6,
        )
        .with_stats(COUNTING_STATS)
        .with_data("edge_subtype", "new_starter")
        .with_data("recent_starts", recent_starts)
        .with_data("previous_starts", prior_starts)
        .for_player(player.id)
        .for_team(&player.team_abbr),
    )
}
