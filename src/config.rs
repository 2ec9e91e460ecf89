use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};

const DATA_DIR: &str = "pp_aggregates";
const DB_FILE: &str = "stats.sqlite";

pub const DB_PATH_ENV: &str = "PP_AGG_DB";
pub const ON_EMPTY_ENV: &str = "PP_AGG_ON_EMPTY";

/// What to do with an existing aggregate row when the player has no stats left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    #[default]
    KeepStale,
    Clear,
}

impl FromStr for EmptyPolicy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "keep" | "keep_stale" | "keep-stale" => Ok(EmptyPolicy::KeepStale),
            "clear" | "delete" => Ok(EmptyPolicy::Clear),
            other => Err(anyhow!("unknown empty policy '{other}' (expected keep or clear)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub on_empty: EmptyPolicy,
}

impl AppConfig {
    /// Reads `PP_AGG_DB` and `PP_AGG_ON_EMPTY`. Blank values count as unset.
    pub fn from_env() -> Result<Self> {
        let db_path = std::env::var(DB_PATH_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let on_empty = match std::env::var(ON_EMPTY_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => EmptyPolicy::default(),
        };
        Ok(Self { db_path, on_empty })
    }

    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        self.db_path.clone().or_else(default_db_path)
    }
}

pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(DATA_DIR).join(DB_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR)
            .join(DB_FILE),
    )
}
