use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pp_aggregates::sqlite_store::{self, SqliteStore};
use pp_aggregates::{Aggregator, AppConfig, EmptyPolicy, PlayerId, RecomputeOutcome};

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    if let Err(err) = run() {
        error!("recompute failed: {err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut cfg = AppConfig::from_env()?;

    let player_id = parse_player_arg(&args)?;
    if let Some(path) = flag_value(&args, "--db") {
        cfg.db_path = Some(PathBuf::from(path));
    }
    if let Some(raw) = flag_value(&args, "--on-empty") {
        cfg.on_empty = raw.parse::<EmptyPolicy>()?;
    }
    let as_json = args.iter().any(|a| a == "--json");

    let db_path = cfg
        .resolved_db_path()
        .context("unable to resolve sqlite path")?;
    let conn = sqlite_store::open_db(&db_path)?;

    info!(player_id, db = %db_path.display(), "recomputing pp aggregate");
    let aggregator = Aggregator::new(SqliteStore::new(&conn)).with_empty_policy(cfg.on_empty);
    let outcome = aggregator.recompute(player_id)?;

    match outcome {
        RecomputeOutcome::Written(agg) => {
            if as_json {
                let json = serde_json::to_string_pretty(&agg).context("serialize aggregate")?;
                println!("{json}");
            } else {
                println!("Player {}", agg.player_id);
                println!(
                    "  all modes: total={:.2} stddev={:.2}",
                    agg.all_modes_total, agg.all_modes_stddev
                );
                println!(
                    "  classic:   total={:.2} stddev={:.2}",
                    agg.classic_total, agg.classic_stddev
                );
                println!(
                    "  relax:     total={:.2} stddev={:.2}",
                    agg.relax_total, agg.relax_stddev
                );
            }
        }
        RecomputeOutcome::Skipped => {
            println!("Player {player_id}: no stats in recognized modes, aggregate left unchanged");
        }
        RecomputeOutcome::Cleared(removed) => {
            if removed {
                println!("Player {player_id}: no stats in recognized modes, aggregate removed");
            } else {
                println!("Player {player_id}: no stats in recognized modes, nothing stored");
            }
        }
    }

    Ok(())
}

fn parse_player_arg(args: &[String]) -> Result<PlayerId> {
    let raw = flag_value(args, "--player").ok_or_else(|| anyhow!("missing --player <id>"))?;
    raw.trim()
        .parse::<PlayerId>()
        .with_context(|| format!("invalid player id '{raw}'"))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}
