use super::COUNTING_STATS;
use crate::engine::types::{Edge, EdgeKind};
use crate::feed::snapshot::SignalSnapshot;
use crate::feed::types::{Game, ScheduleContext};

pub const REST_ADVANTAGE_DAYS: i32 = 2;
pub const HEAVY_WEEK_GAMES: u32 = 4;

fn schedule_edge(game: &Game, team: &str, subtype: &str, description: String, strength: f64) -> Edge {
    Edge::new(EdgeKind::Schedule, description, strength)
        .with_stats(COUNTING_STATS)
        .with_data("edge_subtype", subtype)
        .for_game(&game.id)
        .for_team(team)
        .secondary()
}

/// Rest and fatigue edges. Each edge goes to the side that benefits: the
/// more rested team, or the opponent of a tired one.
pub fn find_schedule_edges(snapshot: &SignalSnapshot) -> Vec<Edge> {
    let mut edges = Vec::new();

    for game in &snapshot.games {
        let home = game.home_team_abbr.as_str();
        let away = game.away_team_abbr.as_str();
        let (Some(home_ctx), Some(away_ctx)) =
            (snapshot.schedules.get(home), snapshot.schedules.get(away))
        else {
            tracing::debug!(game = %game.id, "schedule context missing, skipping");
            continue;
        };
        edges.extend(game_schedule_edges(game, home_ctx, away_ctx));
    }

    tracing::info!(count = edges.len(), "found schedule edges");
    edges
}

pub fn game_schedule_edges(game: &Game, home_ctx: &ScheduleContext, away_ctx: &ScheduleContext) -> Vec<Edge> {
    let home = game.home_team_abbr.as_str();
    let away = game.away_team_abbr.as_str();
    let sides = [(home, away, home_ctx, away_ctx), (away, home, away_ctx, home_ctx)];
    let mut edges = Vec::new();

    // At most one side can hold a rest advantage.
    if let Some((team, opp, ctx, _)) = sides
        .iter()
        .find(|(_, _, ctx, _)| ctx.rest_advantage >= REST_ADVANTAGE_DAYS)
    {
        edges.push(
            schedule_edge(
                game,
                team,
                "rest_advantage",
                format!("{} has {} more rest days than {}", team, ctx.rest_advantage, opp),
                f64::min(0.3 + ctx.rest_advantage as f64 * 0.1, 0.7),
            )
            .with_data("advantage", ctx.rest_advantage),
        );
    }

    for (tired, rested, ctx, opp_ctx) in &sides {
        if ctx.is_back_to_back && !opp_ctx.is_back_to_back {
            edges.push(
                schedule_edge(
                    game,
                    rested,
                    "b2b_fatigue",
                    format!("{} on a back-to-back, {} rested", tired, rested),
                    0.5,
                )
                .with_data("tired_team", *tired),
            );
        }
    }

    for (heavy, opp, ctx, _) in &sides {
        if ctx.games_in_last_7_days >= HEAVY_WEEK_GAMES {
            edges.push(
                schedule_edge(
                    game,
                    opp,
                    "heavy_schedule",
                    format!(
                        "{} playing game {} in 7 days against {}",
                        heavy, ctx.games_in_last_7_days, opp
                    ),
                    0.4,
                )
                .with_data("tired_team", *heavy)
                .with_data("games_in_week", ctx.games_in_last_7_days),
            );
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx(team: &str, rest: i32, b2b: bool, week: u32, adv: i32) -> ScheduleContext {
        ScheduleContext {
            team_abbr: team.to_string(),
            days_rest: rest,
            is_back_to_back: b2b,
            games_in_last_7_days: week,
            is_home: team == "PHX",
            travel_miles: 0.0,
            opponent_days_rest: rest - adv,
            opponent_is_b2b: false,
            rest_advantage: adv,
        }
    }

    fn game() -> Game {
        Game {
            id: "g9".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            home_team_abbr: "PHX".to_string(),
            away_team_abbr: "POR".to_string(),
            total: None,
            spread: None,
        }
    }

    #[test]
    fn test_rest_advantage_to_rested_team() {
        let edges = game_schedule_edges(&game(), &ctx("PHX", 3, false, 2, 3), &ctx("POR", 0, false, 3, -3));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].team_abbr(), Some("PHX"));
        assert!((edges[0].strength() - 0.6).abs() < 1e-9);
        assert!(!edges[0].is_primary());
    }

    #[test]
    fn test_back_to_back_benefits_opponent() {
        let edges = game_schedule_edges(&game(), &ctx("PHX", 1, false, 2, 0), &ctx("POR", 0, true, 3, 0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].team_abbr(), Some("PHX"));
        assert!((edges[0].strength() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_both_on_back_to_back_is_neutral() {
        let edges = game_schedule_edges(&game(), &ctx("PHX", 0, true, 2, 0), &ctx("POR", 0, true, 2, 0));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_heavy_week_benefits_opponent() {
        let edges = game_schedule_edges(&game(), &ctx("PHX", 1, false, 4, 0), &ctx("POR", 1, false, 2, 0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].team_abbr(), Some("POR"));
        assert!((edges[0].strength() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_missing_context_skips_game() {
        let mut s = SignalSnapshot::empty(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        s.games.push(game());
        s.schedules.insert("PHX".to_string(), ctx("PHX", 3, false, 2, 3));
        assert!(find_schedule_edges(&s).is_empty());
    }
}
