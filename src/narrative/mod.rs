pub mod ollama;

use crate::engine::types::{mean, sample_std, PropAnalysis};
use crate::feed::types::Direction;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Write;

pub use ollama::OllamaNarrator;

/// Most closing notes a pick carries.
const MAX_CLOSING_NOTES: usize = 3;
const RECENT_GAMES: usize = 5;

/// Writes the rationale text for a pick.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, analysis: &PropAnalysis) -> Result<String>;
}

/// Average of the prop's stat over the last five games.
fn recent_average(analysis: &PropAnalysis) -> Option<f64> {
    let values = analysis.stat_values();
    mean(&values[..values.len().min(RECENT_GAMES)])
}

/// Prompt handed to the language model. Everything in it comes from the
/// analysis so two runs over the same snapshot ask the same question.
pub fn build_prompt(analysis: &PropAnalysis) -> String {
    let prop = &analysis.prop;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are an NBA analyst. Write one short paragraph explaining the bet below. \
         Lead with today's edge, cite the numbers given, and mention the main risk."
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Player: {} ({}, {})",
        analysis.player.name, prop.team_abbr, analysis.player.position
    );
    let _ = writeln!(
        out,
        "Bet: {} {} {} at {:+} ({})",
        prop.category.label(),
        analysis.direction().as_str(),
        prop.line,
        analysis.price(),
        prop.book
    );
    let _ = writeln!(
        out,
        "Matchup: {} {} {}",
        prop.team_abbr,
        if prop.is_home { "vs" } else { "@" },
        analysis.opponent_abbr
    );
    if let Some(ctx) = &analysis.schedule {
        let _ = writeln!(
            out,
            "Rest: {} days, back-to-back: {}, rest advantage: {}",
            ctx.days_rest, ctx.is_back_to_back, ctx.rest_advantage
        );
    }

    let _ = writeln!(out, "Edges:");
    for edge in analysis.edges() {
        let _ = writeln!(
            out,
            "- [{}] {} (strength {:.2})",
            edge.kind().as_str(),
            edge.description(),
            edge.strength()
        );
    }

    if let Some(avg) = recent_average(analysis) {
        let _ = writeln!(out, "Last {} games average: {:.1}", RECENT_GAMES, avg);
    }
    for (name, split) in &analysis.splits {
        let _ = writeln!(out, "Split {}: {:.1} over {} games", name, split.avg, split.games);
    }
    let _ = writeln!(
        out,
        "Projected range: {:.1} - {:.1}",
        analysis.projected_low(),
        analysis.projected_high()
    );
    for note in analysis.risk_notes() {
        let _ = writeln!(out, "Risk: {}", note);
    }
    out
}

/// Template rationale used whenever the model is off or fails.
pub fn fallback_narrative(analysis: &PropAnalysis) -> String {
    let prop = &analysis.prop;
    let mut parts = vec![format!(
        "{} gets a favorable matchup tonight against {}.",
        analysis.player.name, analysis.opponent_abbr
    )];

    parts.extend(
        analysis
            .edges()
            .iter()
            .take(2)
            .map(|e| e.description().to_string()),
    );

    if let Some(avg) = recent_average(analysis) {
        let games = analysis.game_logs.len().min(RECENT_GAMES);
        parts.push(format!(
            "Averaging {:.1} {} over the last {} games.",
            avg,
            prop.category.label().to_lowercase(),
            games
        ));
    }

    parts.push(format!(
        "Projecting a range of {:.1} - {:.1}, the {} {} looks like value.",
        analysis.projected_low(),
        analysis.projected_high(),
        analysis.direction().as_str(),
        prop.line
    ));
    parts.join(" ")
}

/// Up to three notes for a pick that reached formatting without any:
/// volatile minutes, schedule fatigue, blowout risk, or a line set above
/// recent production.
pub fn closing_risk_notes(analysis: &PropAnalysis) -> Vec<String> {
    let mut notes = Vec::new();

    let minutes: Vec<f64> = analysis.game_logs.iter().take(10).map(|g| g.minutes).collect();
    if let Some(std) = sample_std(&minutes) {
        if std > 6.0 {
            notes.push(format!("Minutes volatile (±{:.1} std dev)", std));
        }
    }

    if let Some(ctx) = &analysis.schedule {
        if ctx.is_back_to_back {
            notes.push("Playing on back-to-back".to_string());
        }
        if ctx.rest_advantage < -1 {
            notes.push(format!(
                "Rest disadvantage ({} fewer days)",
                ctx.rest_advantage.abs()
            ));
        }
    }

    if analysis.game.spread.is_some_and(|s| s.abs() >= 10.0) {
        notes.push("Blowout risk may limit minutes".to_string());
    }

    if analysis.game_logs.len() >= RECENT_GAMES && analysis.direction() == Direction::Over {
        if let Some(avg) = recent_average(analysis) {
            if analysis.prop.line > avg * 1.1 {
                notes.push(format!("Line above recent average ({:.1})", avg));
            }
        }
    }

    notes.truncate(MAX_CLOSING_NOTES);
    notes
}

/// Model text when available, template otherwise. Never fails.
pub async fn narrate_or_fallback(narrator: Option<&dyn Narrator>, analysis: &PropAnalysis) -> String {
    let Some(narrator) = narrator else {
        return fallback_narrative(analysis);
    };
    match narrator.narrate(analysis).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                player = %analysis.player.name,
                error = %e,
                "narrative generation failed, using template"
            );
            fallback_narrative(analysis)
        }
    }
}
