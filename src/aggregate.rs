use anyhow::Result;
use serde::Serialize;

use crate::config::EmptyPolicy;
use crate::modes::ModeFamily;
use crate::stats::{GroupStats, group_stats};
use crate::store::PpStore;

pub type PlayerId = i64;

/// One `(mode, pp)` row from the stats source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeStat {
    pub mode: u8,
    pub pp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerPpAggregate {
    pub player_id: PlayerId,
    pub all_modes_total: f64,
    pub all_modes_stddev: f64,
    pub classic_total: f64,
    pub classic_stddev: f64,
    pub relax_total: f64,
    pub relax_stddev: f64,
}

impl PlayerPpAggregate {
    pub fn from_groups(
        player_id: PlayerId,
        all: GroupStats,
        classic: GroupStats,
        relax: GroupStats,
    ) -> Self {
        Self {
            player_id,
            all_modes_total: all.total,
            all_modes_stddev: all.stddev,
            classic_total: classic.total,
            classic_stddev: classic.stddev,
            relax_total: relax.total,
            relax_stddev: relax.stddev,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeGroups {
    pub all: Vec<f64>,
    pub classic: Vec<f64>,
    pub relax: Vec<f64>,
}

/// Splits rows by family. `all` keeps every row, including unrecognized modes.
pub fn partition(rows: &[ModeStat]) -> ModeGroups {
    let mut groups = ModeGroups::default();
    for row in rows {
        groups.all.push(row.pp);
        match ModeFamily::of(row.mode) {
            Some(ModeFamily::Classic) => groups.classic.push(row.pp),
            Some(ModeFamily::Relax) => groups.relax.push(row.pp),
            None => {}
        }
    }
    groups
}

/// `None` when there is nothing to aggregate.
pub fn compute_aggregate(player_id: PlayerId, rows: &[ModeStat]) -> Option<PlayerPpAggregate> {
    if rows.is_empty() {
        return None;
    }
    let groups = partition(rows);
    Some(PlayerPpAggregate::from_groups(
        player_id,
        group_stats(&groups.all),
        group_stats(&groups.classic),
        group_stats(&groups.relax),
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecomputeOutcome {
    Written(PlayerPpAggregate),
    /// No qualifying rows; the stored aggregate (if any) was left untouched.
    Skipped,
    /// No qualifying rows; the stored aggregate was deleted. `true` if a row existed.
    Cleared(bool),
}

pub struct Aggregator<S> {
    store: S,
    on_empty: EmptyPolicy,
}

impl<S: PpStore> Aggregator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            on_empty: EmptyPolicy::default(),
        }
    }

    pub fn with_empty_policy(mut self, policy: EmptyPolicy) -> Self {
        self.on_empty = policy;
        self
    }

    /// Rebuilds the aggregate row for one player from the current stats.
    ///
    /// Fetch and write are separate store calls with no transaction around
    /// them; concurrent recomputations of the same player are last-write-wins.
    /// Store errors are returned as-is.
    pub fn recompute(&self, player_id: PlayerId) -> Result<RecomputeOutcome> {
        let rows = self.store.fetch_mode_stats(player_id)?;
        let Some(aggregate) = compute_aggregate(player_id, &rows) else {
            return match self.on_empty {
                EmptyPolicy::KeepStale => Ok(RecomputeOutcome::Skipped),
                EmptyPolicy::Clear => {
                    let removed = self.store.delete_aggregate(player_id)?;
                    Ok(RecomputeOutcome::Cleared(removed))
                }
            };
        };
        self.store.upsert_aggregate(&aggregate)?;
        Ok(RecomputeOutcome::Written(aggregate))
    }
}
