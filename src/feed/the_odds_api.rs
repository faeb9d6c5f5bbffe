use super::teams::nba_team_code;
use super::types::*;
use super::OddsProvider;
use crate::config::OddsFeedConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

pub struct TheOddsApi {
    client: Client,
    api_key: String,
    base_url: String,
    sport_key: String,
    bookmakers: String,
    markets: String,
    quota_warning_threshold: Option<u64>,
    last_quota: Option<ApiQuota>,
}

/// the-odds-api.com market key for a prop category.
fn market_key(category: StatCategory) -> &'static str {
    match category {
        StatCategory::Points => "player_points",
        StatCategory::Rebounds => "player_rebounds",
        StatCategory::Assists => "player_assists",
        StatCategory::Threes => "player_threes",
        StatCategory::PtsRebsAsts => "player_points_rebounds_assists",
        StatCategory::PtsAsts => "player_points_assists",
        StatCategory::PtsRebs => "player_points_rebounds",
        StatCategory::RebsAsts => "player_rebounds_assists",
        StatCategory::DoubleDouble => "player_double_double",
    }
}

/// Parse a quota header that may be an integer or float (e.g. "14527.0").
fn parse_quota_header(headers: &reqwest::header::HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v as u64)
        .unwrap_or(0)
}

/// Find the scheduled game an odds-api event refers to.
pub fn match_event<'a>(event: &TheOddsApiEvent, games: &'a [Game]) -> Option<&'a Game> {
    let home = nba_team_code(&event.home_team)?;
    let away = nba_team_code(&event.away_team)?;
    games
        .iter()
        .find(|g| g.home_team_abbr == home && g.away_team_abbr == away)
}

/// Turn one event's player-prop markets into props, one per
/// (player, category, book) that quotes both sides of the same line.
///
/// Books don't report the player's team, so props leave it as `UNK`
/// for the matcher to backfill from the roster.
pub fn parse_event_props(event: &TheOddsApiEvent, game: &Game) -> Vec<Prop> {
    #[derive(Default)]
    struct Sides {
        line: Option<f64>,
        over: Option<i32>,
        under: Option<i32>,
    }

    let mut grouped: BTreeMap<(String, StatCategory, String), Sides> = BTreeMap::new();

    for bm in &event.bookmakers {
        for market in &bm.markets {
            let Some(category) = StatCategory::parse(&market.key) else {
                continue;
            };
            for outcome in &market.outcomes {
                let Some(player) = outcome.description.as_deref() else {
                    continue;
                };
                let key = (player.trim().to_string(), category, bm.title.clone());
                let sides = grouped.entry(key).or_default();
                // A yes/no double-double market has no point; treat it as 0.5.
                let point = outcome.point.unwrap_or(0.5);
                if sides.line.is_some_and(|l| (l - point).abs() > f64::EPSILON) {
                    continue;
                }
                sides.line = Some(point);
                let price = outcome.price.round() as i32;
                match outcome.name.to_lowercase().as_str() {
                    "over" | "yes" => sides.over = Some(price),
                    "under" | "no" => sides.under = Some(price),
                    _ => {}
                }
            }
        }
    }

    grouped
        .into_iter()
        .filter_map(|((player_name, category, book), sides)| {
            Some(Prop {
                player_id: None,
                player_name,
                team_abbr: UNKNOWN_TEAM.to_string(),
                opponent_abbr: UNKNOWN_TEAM.to_string(),
                game_id: game.id.clone(),
                category,
                line: sides.line?,
                over_price: sides.over?,
                under_price: sides.under?,
                book,
                is_home: false,
            })
        })
        .collect()
}

impl TheOddsApi {
    pub fn new(api_key: String, cfg: &OddsFeedConfig, categories: &[StatCategory]) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .context("failed to build odds http client")?;
        let markets = categories
            .iter()
            .map(|c| market_key(*c))
            .collect::<Vec<_>>()
            .join(",");
        Ok(Self {
            client,
            api_key,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            sport_key: cfg.sport_key.clone(),
            bookmakers: cfg.bookmakers.clone(),
            markets,
            quota_warning_threshold: cfg.quota_warning_threshold,
            last_quota: None,
        })
    }

    fn record_quota(&mut self, headers: &reqwest::header::HeaderMap) {
        let quota = ApiQuota {
            requests_used: parse_quota_header(headers, "x-requests-used"),
            requests_remaining: parse_quota_header(headers, "x-requests-remaining"),
        };
        if let Some(threshold) = self.quota_warning_threshold {
            if quota.requests_remaining < threshold {
                tracing::warn!(
                    remaining = quota.requests_remaining,
                    used = quota.requests_used,
                    "odds api quota running low"
                );
            }
        }
        self.last_quota = Some(quota);
    }

    async fn fetch_events(&mut self) -> Result<Vec<TheOddsApiEvent>> {
        let url = format!(
            "{}/v4/sports/{}/events?apiKey={}",
            self.base_url, self.sport_key, self.api_key,
        );
        let resp = self.client.get(&url).send().await
            .context("the-odds-api events request failed")?;
        self.record_quota(resp.headers());

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("the-odds-api events ({}): {}", status, body);
        }
        resp.json().await.context("failed to parse the-odds-api events")
    }

    async fn fetch_event_odds(&mut self, event_id: &str) -> Result<TheOddsApiEvent> {
        let url = format!(
            "{}/v4/sports/{}/events/{}/odds?apiKey={}&regions=us&markets={}&oddsFormat=american&bookmakers={}",
            self.base_url, self.sport_key, event_id, self.api_key, self.markets, self.bookmakers,
        );
        let resp = self.client.get(&url).send().await
            .context("the-odds-api event odds request failed")?;
        self.record_quota(resp.headers());

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("the-odds-api event {} ({}): {}", event_id, status, body);
        }
        resp.json().await.context("failed to parse the-odds-api event odds")
    }
}

#[async_trait]
impl OddsProvider for TheOddsApi {
    async fn props_for_games(&mut self, games: &[Game]) -> Result<Vec<Prop>> {
        let events = self.fetch_events().await?;
        let mut props = Vec::new();

        for event in events {
            let Some(game) = match_event(&event, games) else {
                tracing::debug!(home = %event.home_team, away = %event.away_team, "event not on slate");
                continue;
            };
            match self.fetch_event_odds(&event.id).await {
                Ok(detail) => props.extend(parse_event_props(&detail, game)),
                Err(e) => tracing::warn!(event = %event.id, error = %e, "player props fetch failed"),
            }
        }

        tracing::info!(count = props.len(), "fetched player props");
        Ok(props)
    }

    fn last_quota(&self) -> Option<ApiQuota> {
        self.last_quota.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EVENT_JSON: &str = r#"{
        "id": "abc123",
        "sport_key": "basketball_nba",
        "commence_time": "2025-01-16T00:30:00Z",
        "home_team": "Los Angeles Lakers",
        "away_team": "Boston Celtics",
        "bookmakers": [{
            "key": "draftkings",
            "title": "DraftKings",
            "last_update": "2025-01-15T18:00:00Z",
            "markets": [
                {"key": "player_points", "outcomes": [
                    {"name": "Over", "description": "LeBron James", "price": -115, "point": 24.5},
                    {"name": "Under", "description": "LeBron James", "price": -105, "point": 24.5},
                    {"name": "Over", "description": "Jayson Tatum", "price": 100, "point": 27.5}
                ]},
                {"key": "player_points_rebounds_assists", "outcomes": [
                    {"name": "Over", "description": "LeBron James", "price": -110, "point": 40.5},
                    {"name": "Under", "description": "LeBron James", "price": -110, "point": 40.5}
                ]},
                {"key": "player_blocks", "outcomes": [
                    {"name": "Over", "description": "LeBron James", "price": 120, "point": 0.5},
                    {"name": "Under", "description": "LeBron James", "price": -150, "point": 0.5}
                ]}
            ]
        }]
    }"#;

    fn game() -> Game {
        Game {
            id: "0022400555".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            home_team_abbr: "LAL".to_string(),
            away_team_abbr: "BOS".to_string(),
            total: None,
            spread: None,
        }
    }

    #[test]
    fn test_parse_event_props() {
        let event: TheOddsApiEvent = serde_json::from_str(EVENT_JSON).unwrap();
        let props = parse_event_props(&event, &game());

        // Tatum only has one side quoted; blocks is not a tracked category.
        assert_eq!(props.len(), 2);
        let pts = props.iter().find(|p| p.category == StatCategory::Points).unwrap();
        assert_eq!(pts.player_name, "LeBron James");
        assert_eq!(pts.over_price, -115);
        assert_eq!(pts.under_price, -105);
        assert!((pts.line - 24.5).abs() < 0.001);
        assert_eq!(pts.team_abbr, UNKNOWN_TEAM);
        assert_eq!(pts.game_id, "0022400555");
        assert_eq!(pts.book, "DraftKings");
        assert!(props.iter().any(|p| p.category == StatCategory::PtsRebsAsts));
    }

    #[test]
    fn test_match_event_to_game() {
        let event: TheOddsApiEvent = serde_json::from_str(EVENT_JSON).unwrap();
        let games = vec![game()];
        assert_eq!(match_event(&event, &games).map(|g| g.id.as_str()), Some("0022400555"));

        let mut swapped = game();
        std::mem::swap(&mut swapped.home_team_abbr, &mut swapped.away_team_abbr);
        assert!(match_event(&event, &[swapped]).is_none());
    }

    #[test]
    fn test_market_keys_parse_back() {
        for cat in StatCategory::ALL {
            assert_eq!(StatCategory::parse(market_key(cat)), Some(cat));
        }
    }
}
