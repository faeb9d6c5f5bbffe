use crate::config::Config;
use crate::delivery::FormattedPick;
use crate::edges;
use crate::engine::types::PropAnalysis;
use crate::engine::{matcher, odds, ranker, splits};
use crate::feed::snapshot::{SignalSnapshot, SnapshotProvider};
use crate::feed::types::{GameLog, PlayerId};
use crate::feed::{
    GameProvider, InjuryProvider, OddsProvider, PlayerStatsProvider, ScheduleProvider,
    TeamDefenseProvider,
};
use crate::narrative::{closing_risk_notes, narrate_or_fallback, Narrator};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures_util::future::join_all;
use std::collections::BTreeMap;

/// One provider per signal. Each can be swapped independently, e.g. live
/// odds over an otherwise frozen snapshot.
pub struct SignalSources {
    pub games: Box<dyn GameProvider>,
    pub stats: Box<dyn PlayerStatsProvider>,
    pub defense: Box<dyn TeamDefenseProvider>,
    pub injuries: Box<dyn InjuryProvider>,
    pub schedule: Box<dyn ScheduleProvider>,
    pub odds: Box<dyn OddsProvider>,
}

impl SignalSources {
    pub fn from_snapshot(snapshot: SignalSnapshot) -> Self {
        let provider = SnapshotProvider::new(snapshot);
        Self {
            games: Box::new(provider.clone()),
            stats: Box::new(provider.clone()),
            defense: Box::new(provider.clone()),
            injuries: Box::new(provider.clone()),
            schedule: Box::new(provider.clone()),
            odds: Box::new(provider),
        }
    }

    pub fn with_odds(mut self, odds: Box<dyn OddsProvider>) -> Self {
        self.odds = odds;
        self
    }
}

/// Pull every signal for `date` into one snapshot. Games and props are
/// required; anything else that fails is logged and left out.
pub async fn collect_signals(
    sources: &mut SignalSources,
    date: NaiveDate,
    cfg: &Config,
) -> Result<SignalSnapshot> {
    let mut snapshot = SignalSnapshot::empty(date);
    snapshot.games = sources
        .games
        .todays_games(date)
        .await
        .context("failed to fetch today's games")?;
    tracing::info!(%date, games = snapshot.games.len(), "fetched schedule");
    if snapshot.games.is_empty() {
        return Ok(snapshot);
    }

    snapshot.props = sources
        .odds
        .props_for_games(&snapshot.games)
        .await
        .context("failed to fetch player props")?;
    if let Some(quota) = sources.odds.last_quota() {
        tracing::info!(
            used = quota.requests_used,
            remaining = quota.requests_remaining,
            "odds api quota"
        );
    }

    match sources.stats.league_players().await {
        Ok(players) => snapshot.players = players,
        Err(e) => tracing::warn!(error = %e, "league roster unavailable"),
    }
    match sources.injuries.report().await {
        Ok(report) => snapshot.injuries = report,
        Err(e) => tracing::warn!(error = %e, "injury report unavailable"),
    }

    let teams: Vec<String> = snapshot.playing_teams().into_iter().map(String::from).collect();
    for team in &teams {
        match sources
            .defense
            .defensive_stats(team, cfg.projection.season_window)
            .await
        {
            Ok(Some(stats)) => {
                snapshot.team_defense.insert(team.clone(), stats);
            }
            Ok(None) => tracing::debug!(team = %team, "no defensive stats"),
            Err(e) => tracing::warn!(team = %team, error = %e, "defensive stats fetch failed"),
        }
    }

    let matchups: Vec<(String, String)> = snapshot
        .games
        .iter()
        .flat_map(|g| {
            [
                (g.home_team_abbr.clone(), g.away_team_abbr.clone()),
                (g.away_team_abbr.clone(), g.home_team_abbr.clone()),
            ]
        })
        .collect();
    for (team, opponent) in &matchups {
        match sources.schedule.context(team, opponent, date).await {
            Ok(Some(ctx)) => {
                snapshot.schedules.insert(team.clone(), ctx);
            }
            Ok(None) => tracing::debug!(team = %team, "no schedule context"),
            Err(e) => tracing::warn!(team = %team, error = %e, "schedule context fetch failed"),
        }
    }

    snapshot.game_logs = fetch_game_logs(sources.stats.as_ref(), &snapshot, cfg).await;

    tracing::info!(
        players = snapshot.players.len(),
        logs = snapshot.game_logs.len(),
        defense = snapshot.team_defense.len(),
        injured_teams = snapshot.injuries.len(),
        props = snapshot.props.len(),
        "signals collected"
    );
    Ok(snapshot)
}

/// Game logs for every rostered player on tonight's slate, fetched
/// concurrently. Results land in a BTreeMap keyed by player id so the
/// order requests finish in never shows up downstream.
async fn fetch_game_logs(
    stats: &dyn PlayerStatsProvider,
    snapshot: &SignalSnapshot,
    cfg: &Config,
) -> BTreeMap<PlayerId, Vec<GameLog>> {
    let teams = snapshot.playing_teams();
    let windows = cfg.projection.windows();
    let ids: Vec<PlayerId> = snapshot
        .players
        .iter()
        .filter(|p| teams.contains(p.team_abbr.as_str()))
        .map(|p| p.id)
        .collect();

    let results = join_all(ids.iter().map(|&id| async move {
        (id, stats.recent_games(id, &windows).await)
    }))
    .await;

    let mut logs = BTreeMap::new();
    for (id, result) in results {
        match result {
            Ok(games) if !games.is_empty() => {
                logs.insert(id, games);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(player_id = id, error = %e, "game log fetch failed"),
        }
    }
    logs
}

/// The engine proper: filter props, discover edges, match, enrich, rank,
/// and cut to the final picks. Pure over the snapshot.
pub fn analyze(snapshot: &SignalSnapshot, cfg: &Config) -> Vec<PropAnalysis> {
    let props = odds::filter_props(snapshot.props.clone(), &cfg.props);
    let edges = edges::discover(snapshot, cfg);
    let mut analyses = matcher::match_edges_to_props(&edges, &props, snapshot, &cfg.projection);
    for analysis in &mut analyses {
        splits::enrich(analysis);
    }
    let ranked = ranker::rank(analyses, cfg);
    ranker::final_picks(ranked, &cfg.ranking)
}

/// Attach closing notes and narrative to each pick, then format.
pub async fn finish_picks(
    picks: Vec<PropAnalysis>,
    narrator: Option<&dyn Narrator>,
) -> Vec<FormattedPick> {
    let mut formatted = Vec::with_capacity(picks.len());
    for (i, mut analysis) in picks.into_iter().enumerate() {
        if analysis.risk_notes().is_empty() {
            for note in closing_risk_notes(&analysis) {
                analysis.push_risk_note(note);
            }
        }
        analysis.narrative = Some(narrate_or_fallback(narrator, &analysis).await);
        formatted.push(FormattedPick::from_analysis(i + 1, &analysis));
    }
    formatted
}

/// Full daily run. Returns the collected snapshot alongside the picks so
/// callers can freeze the slate for replay.
pub async fn run_daily(
    sources: &mut SignalSources,
    date: NaiveDate,
    cfg: &Config,
    narrator: Option<&dyn Narrator>,
) -> Result<(SignalSnapshot, Vec<FormattedPick>)> {
    let snapshot = collect_signals(sources, date, cfg).await?;
    let picks = analyze(&snapshot, cfg);
    let formatted = finish_picks(picks, narrator).await;
    tracing::info!(%date, picks = formatted.len(), "daily run complete");
    Ok((snapshot, formatted))
}
