pub mod aggregate;
pub mod config;
pub mod modes;
pub mod sqlite_store;
pub mod stats;
pub mod store;

pub use aggregate::{Aggregator, ModeStat, PlayerId, PlayerPpAggregate, RecomputeOutcome};
pub use config::{AppConfig, EmptyPolicy};
pub use store::{MemoryStore, PpStore};
