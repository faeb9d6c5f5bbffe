use super::minutes_gate::MinutesGate;
use super::odds::odds_value_score;
use super::splits::VS_OPPONENT;
use super::types::{clamp_unit, mean, PropAnalysis, ScoreBreakdown};
use crate::config::{Config, RankingConfig};
use crate::feed::types::Direction;
use std::collections::BTreeMap;

const EDGE_WEIGHT: f64 = 0.35;
const MINUTES_WEIGHT: f64 = 0.25;
const SAMPLE_WEIGHT: f64 = 0.15;
const ODDS_WEIGHT: f64 = 0.15;
const ALIGNMENT_WEIGHT: f64 = 0.10;

/// Mean edge strength, plus 0.1 per edge (max 0.3) and 0.05 per primary edge.
pub fn edge_quality(analysis: &PropAnalysis) -> f64 {
    let edges = analysis.edges();
    let strengths: Vec<f64> = edges.iter().map(|e| e.strength()).collect();
    let Some(avg) = mean(&strengths) else {
        return 0.0;
    };
    let count_bonus = f64::min(edges.len() as f64 * 0.1, 0.3);
    let primary_bonus = edges.iter().filter(|e| e.is_primary()).count() as f64 * 0.05;
    clamp_unit(avg + count_bonus + primary_bonus)
}

/// Game-count tier, plus bonuses for contextual splits, head-to-head
/// history and a full recent window.
pub fn sample_quality(analysis: &PropAnalysis) -> f64 {
    let n = analysis.game_logs.len();
    if n == 0 {
        return 0.0;
    }
    let mut score = match n {
        n if n >= 30 => 0.4,
        n if n >= 20 => 0.3,
        n if n >= 10 => 0.2,
        n if n >= 5 => 0.1,
        _ => 0.0,
    };
    if !analysis.splits.is_empty() {
        score += 0.2;
    }
    if analysis.splits.get(VS_OPPONENT).is_some_and(|s| s.games >= 2) {
        score += 0.2;
    }
    if n >= 5 {
        score += 0.2;
    }
    clamp_unit(score)
}

/// How far the projection clears the line in the recommended direction,
/// with a bonus when even the conservative bound clears it.
pub fn alignment_score(analysis: &PropAnalysis) -> f64 {
    let line = analysis.prop.line;
    let (gap, floor_gap) = match analysis.direction() {
        Direction::Over => (analysis.projected_mid() - line, analysis.projected_low() - line),
        Direction::Under => (line - analysis.projected_mid(), line - analysis.projected_high()),
    };
    let mut score = match gap {
        g if g >= 2.0 => 0.8,
        g if g >= 1.0 => 0.6,
        g if g >= 0.5 => 0.4,
        g if g > 0.0 => 0.2,
        _ => 0.0,
    };
    if floor_gap > 0.0 {
        score += 0.2;
    }
    clamp_unit(score)
}

pub fn score(analysis: &PropAnalysis, gate: &MinutesGate) -> ScoreBreakdown {
    let edge_quality = edge_quality(analysis);
    let minutes_security = clamp_unit(gate.security_score(analysis));
    let sample_quality = sample_quality(analysis);
    let odds_value = clamp_unit(odds_value_score(analysis.price()));
    let alignment = alignment_score(analysis);
    let confidence = clamp_unit(
        edge_quality * EDGE_WEIGHT
            + minutes_security * MINUTES_WEIGHT
            + sample_quality * SAMPLE_WEIGHT
            + odds_value * ODDS_WEIGHT
            + alignment * ALIGNMENT_WEIGHT,
    );
    ScoreBreakdown {
        edge_quality,
        minutes_security,
        sample_quality,
        odds_value,
        alignment,
        confidence,
    }
}

/// Highest confidence first. Ties fall back to player, category, book and
/// line so the order never depends on how props arrived.
pub fn sort_by_confidence(analyses: &mut [PropAnalysis]) {
    analyses.sort_by(|a, b| {
        b.confidence()
            .total_cmp(&a.confidence())
            .then_with(|| a.player.name.cmp(&b.player.name))
            .then_with(|| a.prop.category.cmp(&b.prop.category))
            .then_with(|| a.prop.book.cmp(&b.prop.book))
            .then_with(|| a.prop.line.total_cmp(&b.prop.line))
    });
}

/// Gate, score and order analyses. Props failing the minutes gate are
/// dropped; passing ones carry the gate's and restriction check's notes.
pub fn rank(analyses: Vec<PropAnalysis>, cfg: &Config) -> Vec<PropAnalysis> {
    let gate = MinutesGate::new(&cfg.minutes);
    let total = analyses.len();

    let mut ranked: Vec<PropAnalysis> = analyses
        .into_iter()
        .filter_map(|mut a| {
            if !gate.apply(&mut a) {
                return None;
            }
            gate.restriction_check(&mut a);
            a.scores = score(&a, &gate);
            Some(a)
        })
        .collect();
    sort_by_confidence(&mut ranked);

    tracing::info!(
        total,
        passed = ranked.len(),
        top = ranked.first().map(|a| a.confidence()).unwrap_or(0.0),
        "ranked props"
    );
    ranked
}

/// Quality floor then truncation.
pub fn select(ranked: &[PropAnalysis], max_n: usize, floor: f64) -> Vec<PropAnalysis> {
    ranked
        .iter()
        .filter(|a| a.confidence() >= floor)
        .take(max_n)
        .cloned()
        .collect()
}

/// One greedy pass in rank order, skipping anything whose player or game
/// already has its quota.
pub fn diversify(
    ranked: Vec<PropAnalysis>,
    max_per_player: usize,
    max_per_game: usize,
) -> Vec<PropAnalysis> {
    let mut per_player: BTreeMap<String, usize> = BTreeMap::new();
    let mut per_game: BTreeMap<String, usize> = BTreeMap::new();
    let mut selected = Vec::new();

    for analysis in ranked {
        let player_count = per_player.get(&analysis.player.name).copied().unwrap_or(0);
        let game_count = per_game.get(&analysis.game.id).copied().unwrap_or(0);
        if player_count >= max_per_player || game_count >= max_per_game {
            continue;
        }
        per_player.insert(analysis.player.name.clone(), player_count + 1);
        per_game.insert(analysis.game.id.clone(), game_count + 1);
        selected.push(analysis);
    }
    selected
}

/// Floor, then diversify, then truncate. Diversifying before truncation
/// lets the next-ranked prop backfill a skipped one.
pub fn final_picks(ranked: Vec<PropAnalysis>, cfg: &RankingConfig) -> Vec<PropAnalysis> {
    let above_floor: Vec<PropAnalysis> = ranked
        .into_iter()
        .filter(|a| a.confidence() >= cfg.quality_floor)
        .collect();
    let quality = above_floor.len();
    let mut picks = diversify(above_floor, cfg.max_per_player, cfg.max_per_game);
    picks.truncate(cfg.max_picks);
    tracing::info!(quality, selected = picks.len(), "selected top picks");
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::minutes_gate::tests::analysis_with_minutes;
    use crate::engine::types::{Edge, EdgeKind, Projection, SplitSummary};
    use crate::feed::types::StatCategory;

    fn with_confidence(player: &str, game: &str, confidence: f64) -> PropAnalysis {
        let mut a = analysis_with_minutes(&[32.0; 5], true);
        a.player.name = player.to_string();
        a.game.id = game.to_string();
        a.scores.confidence = confidence;
        a
    }

    fn rebuilt(template: &PropAnalysis, strengths: &[f64], projection: Projection) -> PropAnalysis {
        let edges = strengths
            .iter()
            .map(|&s| Edge::new(EdgeKind::Scheme, "edge", s).with_stats([StatCategory::Points]))
            .collect();
        PropAnalysis::new(
            template.prop.clone(),
            template.player.clone(),
            template.game.clone(),
            template.opponent_abbr.clone(),
            edges,
            template.game_logs.clone(),
            None,
            projection,
        )
        .unwrap()
    }

    #[test]
    fn test_edge_quality() {
        let base = analysis_with_minutes(&[32.0; 5], true);
        let p = Projection { low: 19.0, high: 23.0 };
        // mean 0.5 + 2 edges * 0.1 + 2 primaries * 0.05
        let a = rebuilt(&base, &[0.4, 0.6], p);
        assert!((edge_quality(&a) - 0.8).abs() < 1e-9);
        let a = rebuilt(&base, &[0.9, 0.9, 0.9, 0.9], p);
        assert_eq!(edge_quality(&a), 1.0);
    }

    #[test]
    fn test_confidence_monotonic_in_edge_strength() {
        let gate = MinutesGate::default();
        let base = analysis_with_minutes(&[32.0; 5], true);
        let p = Projection { low: 19.0, high: 23.0 };
        let mut last = 0.0;
        for s in [0.0, 0.1, 0.3, 0.5, 0.6, 0.75, 0.9, 1.0] {
            let c = score(&rebuilt(&base, &[s], p), &gate).confidence;
            assert!(c >= last, "confidence fell from {} to {} at strength {}", last, c, s);
            assert!((0.0..=1.0).contains(&c));
            last = c;
        }
    }

    #[test]
    fn test_sample_quality() {
        let mut a = analysis_with_minutes(&[32.0; 12], true);
        assert!((sample_quality(&a) - 0.4).abs() < 1e-9);
        a.splits.insert("home".to_string(), SplitSummary { games: 6, avg: 20.0 });
        assert!((sample_quality(&a) - 0.6).abs() < 1e-9);
        a.splits.insert(VS_OPPONENT.to_string(), SplitSummary { games: 2, avg: 24.0 });
        assert!((sample_quality(&a) - 0.8).abs() < 1e-9);
        assert_eq!(sample_quality(&analysis_with_minutes(&[], true)), 0.0);
    }

    #[test]
    fn test_alignment() {
        let base = analysis_with_minutes(&[32.0; 5], true);
        // line 19.5, mid 21.5 -> gap 2.0, low 19.0 doesn't clear
        let a = rebuilt(&base, &[0.6], Projection { low: 19.0, high: 24.0 });
        assert!((alignment_score(&a) - 0.8).abs() < 1e-9);
        // low 20.5 clears the line too
        let a = rebuilt(&base, &[0.6], Projection { low: 20.5, high: 23.5 });
        assert!((alignment_score(&a) - 1.0).abs() < 1e-9);
        // mid 20.0 is half a point over, low sits on the line
        let a = rebuilt(&base, &[0.6], Projection { low: 19.5, high: 20.5 });
        assert!((alignment_score(&a) - 0.4).abs() < 1e-9);
        // under: mid 18.0 is 1.5 below, high 19.0 also below the line
        let a = rebuilt(&base, &[0.6], Projection { low: 17.0, high: 19.0 });
        assert_eq!(a.direction(), Direction::Under);
        assert!((alignment_score(&a) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_diversify_one_per_player() {
        let ranked = vec![
            with_confidence("Luka Doncic", "g1", 0.9),
            with_confidence("Luka Doncic", "g1", 0.8),
            with_confidence("Luka Doncic", "g1", 0.7),
        ];
        let picks = diversify(ranked, 1, 2);
        assert_eq!(picks.len(), 1);
        assert!((picks[0].confidence() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_diversify_game_cap_and_backfill() {
        let ranked = vec![
            with_confidence("A", "g1", 0.9),
            with_confidence("B", "g1", 0.85),
            with_confidence("C", "g1", 0.8),
            with_confidence("D", "g2", 0.75),
        ];
        let picks = final_picks(
            ranked,
            &RankingConfig {
                max_picks: 3,
                quality_floor: 0.4,
                max_per_player: 1,
                max_per_game: 2,
            },
        );
        let names: Vec<&str> = picks.iter().map(|a| a.player.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "D"]);
    }

    #[test]
    fn test_floor_applies_before_diversify() {
        let ranked = vec![
            with_confidence("A", "g1", 0.9),
            with_confidence("A", "g2", 0.8),
            with_confidence("B", "g3", 0.3),
        ];
        let picks = final_picks(ranked, &RankingConfig::default());
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].player.name, "A");
    }

    #[test]
    fn test_tied_confidence_breaks_on_book() {
        let mut draftkings = with_confidence("Jayson Tatum", "g1", 0.7);
        draftkings.prop.book = "DraftKings".to_string();
        let mut fanduel = draftkings.clone();
        fanduel.prop.book = "FanDuel".to_string();

        let mut forward = vec![draftkings.clone(), fanduel.clone()];
        let mut reversed = vec![fanduel, draftkings];
        sort_by_confidence(&mut forward);
        sort_by_confidence(&mut reversed);

        let books = |v: &[PropAnalysis]| -> Vec<String> {
            v.iter().map(|a| a.prop.book.clone()).collect()
        };
        assert_eq!(books(&forward), ["DraftKings", "FanDuel"]);
        assert_eq!(books(&forward), books(&reversed));

        let picks = diversify(reversed, 1, 2);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].prop.book, "DraftKings");
    }

    #[test]
    fn test_select() {
        let ranked = vec![
            with_confidence("A", "g1", 0.9),
            with_confidence("B", "g1", 0.5),
            with_confidence("C", "g1", 0.3),
        ];
        assert_eq!(select(&ranked, 5, 0.4).len(), 2);
        assert_eq!(select(&ranked, 1, 0.4).len(), 1);
    }

    #[test]
    fn test_rank_drops_gate_failures_and_sorts() {
        let cfg = Config::default();
        let secure = analysis_with_minutes(&[34.0, 35.0, 33.0, 36.0, 34.0], true);
        let mut other = analysis_with_minutes(&[30.0, 31.0, 29.0, 30.0, 28.0], false);
        other.player.name = "Bench Guy".to_string();
        let dnp = analysis_with_minutes(&[0.0, 30.0, 31.0, 29.0, 30.0], true);

        let ranked = rank(vec![other, dnp, secure], &cfg);
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].confidence() >= ranked[1].confidence());
        assert_eq!(ranked[0].player.name, "Test Guard");
        assert!(ranked.iter().all(|a| a.scores.confidence > 0.0));
    }
}
