use crate::engine::types::PropAnalysis;
use crate::feed::types::{Direction, StatCategory};
use crate::narrative::fallback_narrative;
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write;

const NAME_WIDTH: usize = 24;

/// A pick ready to show to a person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPick {
    pub rank: usize,
    pub player: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub stat_category: StatCategory,
    pub direction: Direction,
    pub line: f64,
    pub book: String,
    pub price: i32,
    pub projected_range: String,
    pub narrative: String,
    pub risk_notes: Vec<String>,
    pub confidence: f64,
}

impl FormattedPick {
    /// `rank` is 1-based.
    pub fn from_analysis(rank: usize, analysis: &PropAnalysis) -> Self {
        Self {
            rank,
            player: analysis.player.name.clone(),
            team_abbr: analysis.prop.team_abbr.clone(),
            opponent_abbr: analysis.opponent_abbr.clone(),
            stat_category: analysis.prop.category,
            direction: analysis.direction(),
            line: analysis.prop.line,
            book: analysis.prop.book.clone(),
            price: analysis.price(),
            projected_range: format!(
                "{:.1} - {:.1}",
                analysis.projected_low(),
                analysis.projected_high()
            ),
            narrative: analysis
                .narrative
                .clone()
                .unwrap_or_else(|| fallback_narrative(analysis)),
            risk_notes: analysis.risk_notes().to_vec(),
            confidence: analysis.confidence(),
        }
    }
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}

/// Plain-text card list for the console.
pub fn format_picks_text(date: NaiveDate, picks: &[FormattedPick]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NBA prop picks for {}", date);
    let _ = writeln!(out, "{}", "=".repeat(60));

    if picks.is_empty() {
        let _ = writeln!(out, "No props cleared the quality floor today.");
        return out;
    }

    for pick in picks {
        let _ = writeln!(
            out,
            "#{:<2} {:<width$} {} {} {} {} ({:+}, {})  conf {:.2}",
            pick.rank,
            truncate_with_ellipsis(&pick.player, NAME_WIDTH),
            pick.stat_category.label(),
            pick.direction.as_str().to_uppercase(),
            pick.line,
            if pick.team_abbr.is_empty() {
                String::new()
            } else {
                format!("[{} vs {}]", pick.team_abbr, pick.opponent_abbr)
            },
            pick.price,
            pick.book,
            pick.confidence,
            width = NAME_WIDTH,
        );
        let _ = writeln!(out, "    Projected: {}", pick.projected_range);
        let _ = writeln!(out, "    {}", pick.narrative);
        for note in &pick.risk_notes {
            let _ = writeln!(out, "    ! {}", note);
        }
        let _ = writeln!(out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::minutes_gate::tests::analysis_with_minutes;

    #[test]
    fn test_from_analysis() {
        let mut a = analysis_with_minutes(&[32.0; 5], true);
        a.scores.confidence = 0.71;
        a.push_risk_note("Playing on back-to-back");
        let pick = FormattedPick::from_analysis(1, &a);

        assert_eq!(pick.player, "Test Guard");
        assert_eq!(pick.stat_category, StatCategory::Points);
        assert_eq!(pick.direction, Direction::Over);
        assert_eq!(pick.price, -110);
        assert_eq!(pick.projected_range, "19.0 - 23.0");
        assert_eq!(pick.risk_notes, vec!["Playing on back-to-back".to_string()]);
        assert!(pick.narrative.starts_with("Test Guard gets a favorable matchup"));
    }

    #[test]
    fn test_narrative_kept_when_present() {
        let mut a = analysis_with_minutes(&[32.0; 5], true);
        a.narrative = Some("Custom.".to_string());
        assert_eq!(FormattedPick::from_analysis(2, &a).narrative, "Custom.");
    }

    #[test]
    fn test_format_text() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut a = analysis_with_minutes(&[32.0; 5], true);
        a.scores.confidence = 0.71;
        a.push_risk_note("Blowout risk may limit minutes");
        let text = format_picks_text(date, &[FormattedPick::from_analysis(1, &a)]);

        assert!(text.starts_with("NBA prop picks for 2025-01-15\n"));
        assert!(text.contains("Points OVER 19.5 [DAL vs HOU] (-110, DraftKings)  conf 0.71"));
        assert!(text.contains("    Projected: 19.0 - 23.0\n"));
        assert!(text.contains("    ! Blowout risk may limit minutes\n"));
    }

    #[test]
    fn test_format_empty() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert!(format_picks_text(date, &[]).contains("No props cleared"));
    }

    #[test]
    fn test_truncate_long_name() {
        assert_eq!(truncate_with_ellipsis("Giannis Antetokounmpo", 24), "Giannis Antetokounmpo");
        assert_eq!(truncate_with_ellipsis("Giannis Antetokounmpo", 10), "Giannis...");
        assert_eq!(truncate_with_ellipsis("abc", 2), "..");
    }
}
