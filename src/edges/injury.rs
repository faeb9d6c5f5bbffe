use super::keywords;
use crate::config::EdgesConfig;
use crate::engine::types::{Edge, EdgeKind};
use crate::feed::snapshot::SignalSnapshot;
use crate::feed::types::{Game, Injury, InjuryStatus};

/// Strength of the edge the *other* team gets when this player sits.
/// 0.3 base, usage and minutes tiers, +0.1 for a confirmed out; capped at 1.0.
pub fn opponent_strength(injury: &Injury) -> f64 {
    let mut s = 0.3;
    s += match injury.usage_rate {
        u if u >= 30.0 => 0.3,
        u if u >= 25.0 => 0.2,
        u if u >= 20.0 => 0.1,
        _ => 0.0,
    };
    s += match injury.minutes_per_game {
        m if m >= 35.0 => 0.2,
        m if m >= 30.0 => 0.1,
        _ => 0.0,
    };
    if injury.status == InjuryStatus::Out {
        s += 0.1;
    }
    f64::min(s, 1.0)
}

/// Strength of the edge the player's own teammates get. Lower base and cap
/// than [`opponent_strength`]: redistribution of the missing usage is uncertain.
pub fn teammate_strength(injury: &Injury) -> f64 {
    let mut s = 0.2;
    s += match injury.usage_rate {
        u if u >= 30.0 => 0.25,
        u if u >= 25.0 => 0.15,
        u if u >= 20.0 => 0.1,
        _ => 0.0,
    };
    s += match injury.minutes_per_game {
        m if m >= 35.0 => 0.15,
        m if m >= 30.0 => 0.1,
        _ => 0.0,
    };
    f64::min(s, 0.8)
}

pub fn find_injury_edges(snapshot: &SignalSnapshot, cfg: &EdgesConfig) -> Vec<Edge> {
    let mut edges = Vec::new();

    for game in &snapshot.games {
        for (injured, other) in [
            (&game.home_team_abbr, &game.away_team_abbr),
            (&game.away_team_abbr, &game.home_team_abbr),
        ] {
            let Some(injuries) = snapshot.injuries.get(injured.as_str()) else {
                continue;
            };
            for injury in injuries.iter().filter(|i| i.status.is_sidelined()) {
                edges.extend(opponent_edge(injury, injured, other, game, cfg));
                edges.extend(teammate_edge(injury, injured, game, cfg));
            }
        }
    }

    tracing::info!(count = edges.len(), "found injury edges");
    edges
}

fn opponent_edge(
    injury: &Injury,
    injured_team: &str,
    benefiting_team: &str,
    game: &Game,
    cfg: &EdgesConfig,
) -> Option<Edge> {
    let affected = keywords::affected_stats(injury);
    if affected.is_empty() {
        tracing::debug!(player = %injury.player_name, "injury has no inferable impact");
        return None;
    }
    let strength = opponent_strength(injury);
    if strength < cfg.min_edge_strength {
        return None;
    }

    Some(
        Edge::new(
            EdgeKind::Injury,
            format!(
                "{} ({}) is {} - {} players benefit",
                injury.player_name,
                injured_team,
                injury.status.as_str(),
                benefiting_team
            ),
            strength,
        )
        .with_stats(affected)
        .with_data("edge_subtype", "opponent_out")
        .with_data("injured_player", injury.player_name.as_str())
        .with_data("injured_team", injured_team)
        .with_data("injury_type", injury.injury_type.as_str())
        .with_data("injury_status", injury.status.as_str())
        .with_data("usage_lost", injury.usage_rate)
        .with_data("minutes_lost", injury.minutes_per_game)
        .with_data("rules", keywords::matched_rules(injury))
        .for_game(&game.id)
        .for_team(benefiting_team),
    )
}

fn teammate_edge(injury: &Injury, team: &str, game: &Game, cfg: &EdgesConfig) -> Option<Edge> {
    if injury.usage_rate < 15.0 && injury.minutes_per_game < 25.0 {
        return None;
    }
    let affected = keywords::affected_stats(injury);
    if affected.is_empty() {
        return None;
    }
    let strength = teammate_strength(injury);
    if strength < cfg.min_edge_strength {
        return None;
    }

    Some(
        Edge::new(
            EdgeKind::Injury,
            format!(
                "With {} out, {} teammates get increased opportunity",
                injury.player_name, team
            ),
            strength,
        )
        .with_stats(affected)
        .with_data("edge_subtype", "teammate_out")
        .with_data("injured_player", injury.player_name.as_str())
        .with_data("usage_available", injury.usage_rate)
        .with_data("minutes_available", injury.minutes_per_game)
        .for_game(&game.id)
        .for_team(team),
    )
}
