use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::Result;

use crate::aggregate::{ModeStat, PlayerId, PlayerPpAggregate};
use crate::modes;

/// Read/write access to the stats source and the aggregate table.
///
/// Connection lifecycle belongs to whoever constructs the store.
pub trait PpStore {
    /// Rows for `player_id` restricted to the recognized mode codes.
    fn fetch_mode_stats(&self, player_id: PlayerId) -> Result<Vec<ModeStat>>;

    /// Inserts the row, or overwrites every value column of an existing one.
    fn upsert_aggregate(&self, aggregate: &PlayerPpAggregate) -> Result<()>;

    /// Returns whether a row was removed.
    fn delete_aggregate(&self, player_id: PlayerId) -> Result<bool>;
}

impl<T: PpStore + ?Sized> PpStore for &T {
    fn fetch_mode_stats(&self, player_id: PlayerId) -> Result<Vec<ModeStat>> {
        (**self).fetch_mode_stats(player_id)
    }

    fn upsert_aggregate(&self, aggregate: &PlayerPpAggregate) -> Result<()> {
        (**self).upsert_aggregate(aggregate)
    }

    fn delete_aggregate(&self, player_id: PlayerId) -> Result<bool> {
        (**self).delete_aggregate(player_id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    stats: RefCell<Vec<(PlayerId, ModeStat)>>,
    aggregates: RefCell<HashMap<PlayerId, PlayerPpAggregate>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_stat(&self, player_id: PlayerId, mode: u8, pp: f64) {
        self.stats
            .borrow_mut()
            .push((player_id, ModeStat { mode, pp }));
    }

    pub fn clear_stats(&self, player_id: PlayerId) {
        self.stats.borrow_mut().retain(|(id, _)| *id != player_id);
    }

    pub fn aggregate(&self, player_id: PlayerId) -> Option<PlayerPpAggregate> {
        self.aggregates.borrow().get(&player_id).cloned()
    }

    /// Number of upserts applied plus deletes that removed a row.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl PpStore for MemoryStore {
    fn fetch_mode_stats(&self, player_id: PlayerId) -> Result<Vec<ModeStat>> {
        Ok(self
            .stats
            .borrow()
            .iter()
            .filter(|(id, row)| *id == player_id && modes::is_recognized(row.mode))
            .map(|(_, row)| *row)
            .collect())
    }

    fn upsert_aggregate(&self, aggregate: &PlayerPpAggregate) -> Result<()> {
        self.aggregates
            .borrow_mut()
            .insert(aggregate.player_id, aggregate.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn delete_aggregate(&self, player_id: PlayerId) -> Result<bool> {
        let removed = self.aggregates.borrow_mut().remove(&player_id).is_some();
        if removed {
            self.writes.set(self.writes.get() + 1);
        }
        Ok(removed)
    }
}
