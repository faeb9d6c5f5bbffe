use anyhow::{Context, Result};
use chrono::NaiveDate;
use prop_edge::config::Config;
use prop_edge::delivery::format_picks_text;
use prop_edge::feed::snapshot::SignalSnapshot;
use prop_edge::feed::the_odds_api::TheOddsApi;
use prop_edge::narrative::{Narrator, OllamaNarrator};
use prop_edge::pipeline::{self, SignalSources};
use std::path::Path;

const USAGE: &str = "\
usage: prop-edge [--snapshot PATH] [--config PATH] [--date YYYY-MM-DD]
                 [--live-odds] [--no-llm] [--json] [--save-snapshot PATH]";

/// Value following `flag`, if the flag is present.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("prop-edge.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("prop_edge=info")
        .with_writer(log_file)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let config_path = arg_value(&args, "--config").unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(Path::new(&config_path))?;

    let snapshot_path =
        arg_value(&args, "--snapshot").unwrap_or_else(|| "snapshot.json".to_string());
    let snapshot = SignalSnapshot::load(Path::new(&snapshot_path))?;

    let date = match arg_value(&args, "--date") {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --date {:?}, expected YYYY-MM-DD", raw))?,
        None => snapshot.date,
    };

    let mut sources = SignalSources::from_snapshot(snapshot);
    if has_flag(&args, "--live-odds") {
        // Saved keys from .env; real env vars take precedence.
        Config::load_env_file();
        let key = Config::odds_api_key()?;
        let odds = TheOddsApi::new(key, &config.odds_feed, &config.props.categories)?;
        sources = sources.with_odds(Box::new(odds));
    }

    let ollama = if config.narrative.enabled && !has_flag(&args, "--no-llm") {
        let narrator = OllamaNarrator::new(&config.narrative)?;
        if narrator.is_available().await {
            Some(narrator)
        } else {
            tracing::warn!(url = %config.narrative.ollama_url, "ollama unavailable, using template narratives");
            None
        }
    } else {
        None
    };
    let narrator = ollama.as_ref().map(|n| n as &dyn Narrator);

    let (collected, picks) = pipeline::run_daily(&mut sources, date, &config, narrator).await?;

    if let Some(path) = arg_value(&args, "--save-snapshot") {
        collected.save(Path::new(&path))?;
        tracing::info!(path = %path, "saved snapshot");
    }

    if has_flag(&args, "--json") {
        println!("{}", serde_json::to_string_pretty(&picks)?);
    } else {
        print!("{}", format_picks_text(date, &picks));
    }
    Ok(())
}
