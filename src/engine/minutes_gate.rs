use super::types::{mean, sample_std, PropAnalysis};
use crate::config::MinutesConfig;

/// Window for the continuous score.
const SCORE_WINDOW: usize = 10;

/// Why a player's minutes are not trusted.
#[derive(Debug, Clone, PartialEq)]
pub enum GateFailure {
    NoLogs,
    InsufficientGames(usize),
    RecentDnp(usize),
    LowAverage(f64),
    HighVariance(f64),
}

impl GateFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            GateFailure::NoLogs => "no_game_logs",
            GateFailure::InsufficientGames(_) => "insufficient_games",
            GateFailure::RecentDnp(_) => "recent_dnp",
            GateFailure::LowAverage(_) => "low_avg_minutes",
            GateFailure::HighVariance(_) => "high_variance",
        }
    }
}

/// Rejects props whose playing time is too unstable to trust a projection,
/// and scores minutes security for the ranker.
#[derive(Debug, Clone)]
pub struct MinutesGate {
    min_minutes: f64,
    min_games: usize,
    max_std: f64,
}

impl MinutesGate {
    pub fn new(cfg: &MinutesConfig) -> Self {
        Self {
            min_minutes: cfg.min_minutes_threshold,
            min_games: cfg.min_games,
            max_std: cfg.max_minutes_std,
        }
    }

    /// Gate verdict plus the non-fatal warnings a passing player carries.
    pub fn evaluate(&self, analysis: &PropAnalysis) -> Result<Vec<String>, GateFailure> {
        let logs = &analysis.game_logs;
        if logs.is_empty() {
            return Err(GateFailure::NoLogs);
        }
        if logs.len() < self.min_games {
            return Err(GateFailure::InsufficientGames(logs.len()));
        }

        let recent: Vec<f64> = logs[..self.min_games].iter().map(|g| g.minutes).collect();
        let dnps = recent.iter().filter(|&&m| m == 0.0).count();
        if dnps > 0 {
            return Err(GateFailure::RecentDnp(dnps));
        }
        let avg = mean(&recent).unwrap_or_default();
        if avg < self.min_minutes {
            return Err(GateFailure::LowAverage(avg));
        }
        if let Some(std) = sample_std(&recent) {
            if std > self.max_std {
                return Err(GateFailure::HighVariance(std));
            }
        }

        let mut notes = Vec::new();
        let low = recent.iter().copied().fold(f64::INFINITY, f64::min);
        if low < 15.0 && avg > 25.0 {
            notes.push(format!("Had {:.0} min game recently (avg {:.1})", low, avg));
        }
        if logs.len() >= 10 {
            let last5: Vec<f64> = logs[..5].iter().map(|g| g.minutes).collect();
            let prev5: Vec<f64> = logs[5..10].iter().map(|g| g.minutes).collect();
            if let (Some(r), Some(p)) = (mean(&last5), mean(&prev5)) {
                if r < p - 5.0 {
                    notes.push(format!("Minutes trending down: {:.1} → {:.1}", p, r));
                }
            }
        }
        Ok(notes)
    }

    pub fn is_secure(&self, analysis: &PropAnalysis) -> bool {
        self.evaluate(analysis).is_ok()
    }

    /// Run the gate and append its warnings to the analysis.
    /// Returns false when the prop should be excluded.
    pub fn apply(&self, analysis: &mut PropAnalysis) -> bool {
        match self.evaluate(analysis) {
            Ok(notes) => {
                for note in notes {
                    analysis.push_risk_note(note);
                }
                true
            }
            Err(failure) => {
                tracing::debug!(
                    player = %analysis.player.name,
                    reason = failure.reason(),
                    "minutes gate failed"
                );
                false
            }
        }
    }

    /// 0.5 baseline moved by average minutes, consistency, starter rate and
    /// DNPs over the last ten games. Zero with fewer than three logs.
    pub fn security_score(&self, analysis: &PropAnalysis) -> f64 {
        let logs = &analysis.game_logs;
        if logs.len() < 3 {
            return 0.0;
        }
        let window = &logs[..logs.len().min(SCORE_WINDOW)];
        let minutes: Vec<f64> = window.iter().map(|g| g.minutes).collect();
        let mut score = 0.5;

        let avg = mean(&minutes).unwrap_or_default();
        score += match avg {
            a if a >= 35.0 => 0.2,
            a if a >= 30.0 => 0.15,
            a if a >= 28.0 => 0.1,
            a if a >= self.min_minutes => 0.05,
            _ => -0.1,
        };

        if let Some(std) = sample_std(&minutes) {
            score += match std {
                s if s < 3.0 => 0.2,
                s if s < 5.0 => 0.1,
                s if s > 8.0 => -0.1,
                _ => 0.0,
            };
        }

        let start_rate = window.iter().filter(|g| g.started).count() as f64 / window.len() as f64;
        score += match start_rate {
            r if r >= 0.8 => 0.1,
            r if r >= 0.5 => 0.05,
            r if r == 0.0 => -0.05,
            _ => 0.0,
        };

        let dnps = minutes.iter().filter(|&&m| m == 0.0).count();
        score += if dnps == 0 { 0.05 } else { -0.1 * dnps as f64 };

        score.clamp(0.0, 1.0)
    }

    /// Advisory check for a player who may be on a minutes restriction:
    /// a ramp-up from a restricted game, or a last game far below the
    /// season norm. Appends a risk note and returns true when either shows.
    pub fn restriction_check(&self, analysis: &mut PropAnalysis) -> bool {
        let logs = &analysis.game_logs;
        if logs.len() < 3 {
            return false;
        }

        let (m0, m1, m2) = (logs[0].minutes, logs[1].minutes, logs[2].minutes);
        if m0 > m1 && m1 > m2 && m2 < 20.0 {
            analysis.push_risk_note(format!(
                "Possible minutes ramp: {:.0} → {:.0} → {:.0} min",
                m2, m1, m0
            ));
            return true;
        }

        if logs.len() >= 10 {
            let all: Vec<f64> = logs.iter().map(|g| g.minutes).collect();
            let season_avg = mean(&all).unwrap_or_default();
            if m0 < season_avg - 10.0 {
                analysis.push_risk_note(format!(
                    "Last game minutes ({:.0}) well below season average ({:.1})",
                    m0, season_avg
                ));
                return true;
            }
        }

        false
    }
}

impl Default for MinutesGate {
    fn default() -> Self {
        Self::new(&MinutesConfig::default())
    }
}
