use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::Path;

use crate::feed::types::StatCategory;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub edges: EdgesConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub minutes: MinutesConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub props: PropsConfig,
    #[serde(default)]
    pub odds_feed: OddsFeedConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EdgesConfig {
    /// Injury edges weaker than this are discarded.
    #[serde(default = "default_min_edge_strength")]
    pub min_edge_strength: f64,
}

fn default_min_edge_strength() -> f64 { 0.5 }

impl Default for EdgesConfig {
    fn default() -> Self {
        Self {
            min_edge_strength: default_min_edge_strength(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectionConfig {
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    #[serde(default = "default_medium_window")]
    pub medium_window: usize,
    /// Number of games requested from the stats provider per player.
    #[serde(default = "default_season_window")]
    pub season_window: usize,
}

fn default_recent_window() -> usize { 5 }
fn default_medium_window() -> usize { 10 }
fn default_season_window() -> usize { 15 }

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            recent_window: default_recent_window(),
            medium_window: default_medium_window(),
            season_window: default_season_window(),
        }
    }
}

impl ProjectionConfig {
    pub fn windows(&self) -> [usize; 3] {
        [self.recent_window, self.medium_window, self.season_window]
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MinutesConfig {
    #[serde(default = "default_min_minutes")]
    pub min_minutes_threshold: f64,
    #[serde(default = "default_min_games")]
    pub min_games: usize,
    #[serde(default = "default_max_minutes_std")]
    pub max_minutes_std: f64,
}

fn default_min_minutes() -> f64 { 24.0 }
fn default_min_games() -> usize { 5 }
fn default_max_minutes_std() -> f64 { 7.0 }

impl Default for MinutesConfig {
    fn default() -> Self {
        Self {
            min_minutes_threshold: default_min_minutes(),
            min_games: default_min_games(),
            max_minutes_std: default_max_minutes_std(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_max_picks")]
    pub max_picks: usize,
    #[serde(default = "default_quality_floor")]
    pub quality_floor: f64,
    #[serde(default = "default_max_per_player")]
    pub max_per_player: usize,
    #[serde(default = "default_max_per_game")]
    pub max_per_game: usize,
}

fn default_max_picks() -> usize { 4 }
fn default_quality_floor() -> f64 { 0.4 }
fn default_max_per_player() -> usize { 1 }
fn default_max_per_game() -> usize { 2 }

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_picks: default_max_picks(),
            quality_floor: default_quality_floor(),
            max_per_player: default_max_per_player(),
            max_per_game: default_max_per_game(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PropsConfig {
    /// Worst American price we will accept on either side (e.g. -140).
    #[serde(default = "default_juice_ceiling")]
    pub juice_ceiling: i32,
    #[serde(default = "default_categories")]
    pub categories: Vec<StatCategory>,
}

fn default_juice_ceiling() -> i32 { -140 }
fn default_categories() -> Vec<StatCategory> {
    StatCategory::ALL.to_vec()
}

impl Default for PropsConfig {
    fn default() -> Self {
        Self {
            juice_ceiling: default_juice_ceiling(),
            categories: default_categories(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OddsFeedConfig {
    #[serde(default = "default_odds_base_url")]
    pub base_url: String,
    #[serde(default = "default_bookmakers")]
    pub bookmakers: String,
    #[serde(default = "default_sport_key")]
    pub sport_key: String,
    #[serde(default = "default_odds_timeout")]
    pub request_timeout_ms: u64,
    pub quota_warning_threshold: Option<u64>,
}

fn default_odds_base_url() -> String { "https://api.the-odds-api.com".to_string() }
fn default_bookmakers() -> String { "draftkings,fanduel".to_string() }
fn default_sport_key() -> String { "basketball_nba".to_string() }
fn default_odds_timeout() -> u64 { 10_000 }

impl Default for OddsFeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_odds_base_url(),
            bookmakers: default_bookmakers(),
            sport_key: default_sport_key(),
            request_timeout_ms: default_odds_timeout(),
            quota_warning_threshold: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NarrativeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_narrative_timeout")]
    pub timeout_ms: u64,
}

fn default_true() -> bool { true }
fn default_ollama_url() -> String { "http://localhost:11434".to_string() }
fn default_model() -> String { "llama3.1:8b".to_string() }
fn default_narrative_timeout() -> u64 { 60_000 }

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ollama_url: default_ollama_url(),
            model: default_model(),
            timeout_ms: default_narrative_timeout(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.edges.min_edge_strength),
            "edges.min_edge_strength must be within [0, 1]"
        );
        ensure!(
            (0.0..=1.0).contains(&self.ranking.quality_floor),
            "ranking.quality_floor must be within [0, 1]"
        );
        ensure!(self.ranking.max_per_player > 0, "ranking.max_per_player must be positive");
        ensure!(self.ranking.max_per_game > 0, "ranking.max_per_game must be positive");
        let p = &self.projection;
        ensure!(
            p.recent_window > 0 && p.recent_window <= p.medium_window && p.medium_window <= p.season_window,
            "projection windows must satisfy 0 < recent <= medium <= season"
        );
        ensure!(self.minutes.min_games > 0, "minutes.min_games must be positive");
        Ok(())
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// Odds key comes from the environment, or is prompted for and saved to .env.
    pub fn odds_api_key() -> Result<String> {
        match std::env::var("ODDS_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(sanitize_key(&key)),
            _ => {
                let key = prompt("Odds API Key (the-odds-api.com)")?;
                save_env_var("ODDS_API_KEY", &key);
                Ok(key)
            }
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("  {} > ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let value = sanitize_key(&input);
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }
    Ok(value)
}

/// Strip carriage returns, BOM, and other invisible chars from a key value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

/// Append a KEY=VALUE line to .env and set it in the current process.
fn save_env_var(key: &str, value: &str) {
    std::env::set_var(key, value);
    let path = Path::new(ENV_FILE);
    let mut contents = std::fs::read_to_string(path).unwrap_or_default();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&format!("{}={}\n", key, value));
    if let Err(e) = std::fs::write(path, contents) {
        tracing::warn!(error = %e, "could not persist {} to .env", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert!((config.edges.min_edge_strength - 0.5).abs() < 0.001);
        assert_eq!(config.projection.windows(), [5, 10, 15]);
        assert_eq!(config.minutes.min_games, 5);
        assert_eq!(config.ranking.max_picks, 4);
        assert_eq!(config.ranking.max_per_game, 2);
        assert_eq!(config.props.juice_ceiling, -140);
        assert!(config.props.categories.contains(&StatCategory::PtsRebsAsts));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!((config.ranking.quality_floor - 0.4).abs() < 0.001);
        assert!((config.minutes.min_minutes_threshold - 24.0).abs() < 0.001);
        assert_eq!(config.props.categories.len(), StatCategory::ALL.len());
        assert!(config.narrative.enabled);
        assert_eq!(config.ranking.max_picks, 4);
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config = Config::parse("[ranking]\nmax_picks = 3\n").unwrap();
        assert_eq!(config.ranking.max_picks, 3);
        assert_eq!(config.ranking.max_per_player, 1);
    }

    #[test]
    fn test_invalid_floor_rejected() {
        assert!(Config::parse("[ranking]\nquality_floor = 1.5\n").is_err());
    }

    #[test]
    fn test_bad_window_order_rejected() {
        assert!(Config::parse("[projection]\nrecent_window = 12\n").is_err());
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("\u{feff}abc123\r\n"), "abc123");
    }
}
