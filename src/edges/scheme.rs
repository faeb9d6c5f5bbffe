use crate::engine::types::{Edge, EdgeKind};
use crate::feed::snapshot::SignalSnapshot;
use crate::feed::types::{Game, Player, StatCategory, TeamDefenseStats};

/// Ranks at or beyond this (bottom half of the league) count as a weakness.
pub const WEAK_RANK: u8 = 16;

/// 0.03 per rank around rank 20, floored at 0 and capped at 0.8.
pub fn rank_strength(base: f64, rank: u8) -> f64 {
    (base + (rank as f64 - 20.0) * 0.03).clamp(0.0, 0.8)
}

struct Weakness {
    stat: &'static str,
    label: &'static str,
    rank: fn(&TeamDefenseStats) -> u8,
    allowed: fn(&TeamDefenseStats) -> f64,
    affected: &'static [StatCategory],
}

const WEAKNESSES: [Weakness; 4] = [
    Weakness {
        stat: "points",
        label: "points allowed",
        rank: |d| d.pts_rank,
        allowed: |d| d.pts_allowed,
        affected: &[
            StatCategory::Points,
            StatCategory::PtsRebsAsts,
            StatCategory::PtsAsts,
            StatCategory::PtsRebs,
        ],
    },
    Weakness {
        stat: "rebounds",
        label: "rebounds allowed",
        rank: |d| d.reb_rank,
        allowed: |d| d.reb_allowed,
        affected: &[
            StatCategory::Rebounds,
            StatCategory::PtsRebsAsts,
            StatCategory::PtsRebs,
            StatCategory::RebsAsts,
            StatCategory::DoubleDouble,
        ],
    },
    Weakness {
        stat: "assists",
        label: "assists allowed",
        rank: |d| d.ast_rank,
        allowed: |d| d.ast_allowed,
        affected: &[
            StatCategory::Assists,
            StatCategory::PtsRebsAsts,
            StatCategory::PtsAsts,
            StatCategory::RebsAsts,
            StatCategory::DoubleDouble,
        ],
    },
    Weakness {
        stat: "threes",
        label: "3PM allowed",
        rank: |d| d.fg3m_rank,
        allowed: |d| d.fg3m_allowed,
        affected: &[StatCategory::Threes, StatCategory::Points],
    },
];

/// Each side of a game is attacked against the other side's defensive ranks.
fn matchups(game: &Game) -> [(&str, &str); 2] {
    [
        (game.away_team_abbr.as_str(), game.home_team_abbr.as_str()),
        (game.home_team_abbr.as_str(), game.away_team_abbr.as_str()),
    ]
}

pub fn find_scheme_edges(snapshot: &SignalSnapshot) -> Vec<Edge> {
    let mut edges = Vec::new();

    for game in &snapshot.games {
        for (attacking, defending) in matchups(game) {
            let Some(defense) = snapshot.team_defense.get(defending) else {
                tracing::debug!(team = defending, "no defensive stats, skipping scheme check");
                continue;
            };
            for w in &WEAKNESSES {
                let rank = (w.rank)(defense);
                if rank < WEAK_RANK {
                    continue;
                }
                edges.push(
                    Edge::new(
                        EdgeKind::Scheme,
                        format!(
                            "{} ranks {}th in {} ({:.1}/game) - opportunity for {}",
                            defending, rank, w.label, (w.allowed)(defense), attacking
                        ),
                        rank_strength(0.4, rank),
                    )
                    .with_stats(w.affected.iter().copied())
                    .with_data("defensive_stat", w.stat)
                    .with_data("rank", rank)
                    .with_data("allowed", (w.allowed)(defense))
                    .with_data("defending_team", defending)
                    .for_game(&game.id)
                    .for_team(attacking),
                );
            }
        }
    }

    tracing::info!(count = edges.len(), "found scheme edges");
    edges
}

/// Player-targeted matchups: rostered centers against poor rebounding
/// defenses and guards against poor perimeter defenses.
pub fn find_positional_edges(snapshot: &SignalSnapshot) -> Vec<Edge> {
    let mut edges = Vec::new();

    for game in &snapshot.games {
        for (attacking, defending) in matchups(game) {
            let Some(defense) = snapshot.team_defense.get(defending) else {
                continue;
            };
            for player in snapshot.players.iter().filter(|p| p.team_abbr == attacking) {
                edges.extend(positional_edges(player, defense, &game.id));
            }
        }
    }

    tracing::info!(count = edges.len(), "found positional edges");
    edges
}

pub fn positional_edges(player: &Player, defense: &TeamDefenseStats, game_id: &str) -> Vec<Edge> {
    let position = player.position.to_uppercase();
    let mut edges = Vec::new();

    if position.contains('C') && defense.reb_rank >= WEAK_RANK {
        edges.push(
            Edge::new(
                EdgeKind::Scheme,
                format!(
                    "{} (C) vs {}'s weak interior defense (#{} reb allowed)",
                    player.name, defense.team_abbr, defense.reb_rank
                ),
                rank_strength(0.5, defense.reb_rank),
            )
            .with_stats([
                StatCategory::Rebounds,
                StatCategory::Points,
                StatCategory::PtsRebs,
                StatCategory::DoubleDouble,
            ])
            .with_data("edge_subtype", "positional")
            .with_data("position", position.as_str())
            .with_data("opponent_reb_rank", defense.reb_rank),
        );
    }

    if position.contains('G') && defense.fg3m_rank >= WEAK_RANK {
        edges.push(
            Edge::new(
                EdgeKind::Scheme,
                format!(
                    "{} (G) vs {}'s weak perimeter defense (#{} 3PM allowed)",
                    player.name, defense.team_abbr, defense.fg3m_rank
                ),
                rank_strength(0.5, defense.fg3m_rank),
            )
            .with_stats([StatCategory::Threes, StatCategory::Points])
            .with_data("edge_subtype", "positional")
            .with_data("position", position.as_str())
            .with_data("opponent_3pm_rank", defense.fg3m_rank),
        );
    }

    edges
        .into_iter()
        .map(|e| e.for_player(player.id).for_team(&player.team_abbr).for_game(game_id))
        .collect()
}
