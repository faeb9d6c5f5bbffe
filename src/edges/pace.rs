use super::COUNTING_STATS;
use crate::engine::types::{Edge, EdgeKind};
use crate::feed::snapshot::SignalSnapshot;
use crate::feed::types::StatCategory;

pub const HIGH_PACE: f64 = 102.0;
pub const MISMATCH_DIFF: f64 = 3.0;

pub fn find_pace_edges(snapshot: &SignalSnapshot) -> Vec<Edge> {
    let mut edges = Vec::new();

    for game in &snapshot.games {
        let home = &game.home_team_abbr;
        let away = &game.away_team_abbr;
        let pace_of = |team: &str| snapshot.team_defense.get(team).and_then(|d| d.pace);
        let (Some(home_pace), Some(away_pace)) = (pace_of(home.as_str()), pace_of(away.as_str())) else {
            tracing::debug!(game = %game.id, "pace unavailable, skipping");
            continue;
        };

        let combined = (home_pace + away_pace) / 2.0;
        if combined >= HIGH_PACE {
            let strength = f64::min(0.3 + (combined - 100.0) * 0.05, 0.6);
            // Both sides get the extra possessions.
            for team in [home, away] {
                edges.push(
                    Edge::new(
                        EdgeKind::Pace,
                        format!(
                            "High pace environment ({:.1}) - more counting-stat opportunities",
                            combined
                        ),
                        strength,
                    )
                    .with_stats(COUNTING_STATS)
                    .with_data("pace_type", "high")
                    .with_data("home_pace", home_pace)
                    .with_data("away_pace", away_pace)
                    .with_data("combined_pace", combined)
                    .for_game(&game.id)
                    .for_team(team)
                    .secondary(),
                );
            }
        }

        let diff = (home_pace - away_pace).abs();
        if diff >= MISMATCH_DIFF {
            let (fast, slow) = if home_pace > away_pace { (home, away) } else { (away, home) };
            edges.push(
                Edge::new(
                    EdgeKind::Pace,
                    format!(
                        "Pace mismatch: {} ({:.1}) vs {} ({:.1})",
                        fast,
                        home_pace.max(away_pace),
                        slow,
                        home_pace.min(away_pace)
                    ),
                    f64::min(0.3 + diff * 0.05, 0.6),
                )
                .with_stats([StatCategory::Points, StatCategory::Rebounds, StatCategory::Assists])
                .with_data("pace_type", "mismatch")
                .with_data("pace_difference", diff)
                .for_game(&game.id)
                .for_team(fast)
                .secondary(),
            );
        }
    }

    tracing::info!(count = edges.len(), "found pace edges");
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::{Game, TeamDefenseStats};
    use chrono::NaiveDate;

    fn snapshot(home_pace: Option<f64>, away_pace: Option<f64>) -> SignalSnapshot {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut s = SignalSnapshot::empty(date);
        s.games.push(Game {
            id: "g1".to_string(),
            date,
            home_team_abbr: "IND".to_string(),
            away_team_abbr: "ATL".to_string(),
            total: None,
            spread: None,
        });
        for (team, pace) in [("IND", home_pace), ("ATL", away_pace)] {
            s.team_defense.insert(
                team.to_string(),
                TeamDefenseStats {
                    team_abbr: team.to_string(),
                    pts_allowed: 115.0,
                    reb_allowed: 44.0,
                    ast_allowed: 26.0,
                    fg3m_allowed: 13.0,
                    pts_rank: 10,
                    reb_rank: 10,
                    ast_rank: 10,
                    fg3m_rank: 10,
                    pace,
                },
            );
        }
        s
    }

    #[test]
    fn test_high_pace_edges_for_both_teams() {
        let edges = find_pace_edges(&snapshot(Some(103.0), Some(102.0)));
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| !e.is_primary()));
        // 0.3 + 2.5 * 0.05
        assert!(edges.iter().all(|e| (e.strength() - 0.425).abs() < 1e-9));
        assert!(edges.iter().any(|e| e.team_abbr() == Some("IND")));
        assert!(edges.iter().any(|e| e.team_abbr() == Some("ATL")));
    }

    #[test]
    fn test_mismatch_goes_to_faster_team() {
        let edges = find_pace_edges(&snapshot(Some(96.0), Some(101.0)));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].team_abbr(), Some("ATL"));
        assert!((edges[0].strength() - 0.55).abs() < 1e-9);
        assert!(!edges[0].is_primary());
    }

    #[test]
    fn test_mismatch_strength_capped() {
        let edges = find_pace_edges(&snapshot(Some(92.0), Some(101.0)));
        assert_eq!(edges[0].strength(), 0.6);
    }

    #[test]
    fn test_missing_pace_skips_game() {
        assert!(find_pace_edges(&snapshot(Some(104.0), None)).is_empty());
    }
}
