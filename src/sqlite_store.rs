use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::aggregate::{ModeStat, PlayerId, PlayerPpAggregate};
use crate::modes;
use crate::store::PpStore;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .context("enable wal journal")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates the stats source and aggregate tables when missing.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS stats (
            id INTEGER NOT NULL,
            mode INTEGER NOT NULL,
            pp REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (id, mode)
        );

        CREATE TABLE IF NOT EXISTS player_pp_aggregates (
            player_id INTEGER PRIMARY KEY,
            all_modes_total REAL NOT NULL,
            all_modes_stddev REAL NOT NULL,
            classic_total REAL NOT NULL,
            classic_stddev REAL NOT NULL,
            relax_total REAL NOT NULL,
            relax_stddev REAL NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn upsert_stat(conn: &Connection, player_id: PlayerId, mode: u8, pp: f64) -> Result<()> {
    conn.execute(
        "INSERT INTO stats (id, mode, pp) VALUES (?1, ?2, ?3)
         ON CONFLICT(id, mode) DO UPDATE SET pp = excluded.pp",
        params![player_id, mode as i64, pp],
    )
    .context("upsert stat")?;
    Ok(())
}

pub fn delete_stats(conn: &Connection, player_id: PlayerId) -> Result<usize> {
    conn.execute("DELETE FROM stats WHERE id = ?1", params![player_id])
        .context("delete stats")
}

pub fn load_aggregate(conn: &Connection, player_id: PlayerId) -> Result<Option<PlayerPpAggregate>> {
    conn.query_row(
        r#"
        SELECT
            player_id,
            all_modes_total, all_modes_stddev,
            classic_total, classic_stddev,
            relax_total, relax_stddev
        FROM player_pp_aggregates
        WHERE player_id = ?1
        "#,
        params![player_id],
        |row| {
            Ok(PlayerPpAggregate {
                player_id: row.get(0)?,
                all_modes_total: row.get(1)?,
                all_modes_stddev: row.get(2)?,
                classic_total: row.get(3)?,
                classic_stddev: row.get(4)?,
                relax_total: row.get(5)?,
                relax_stddev: row.get(6)?,
            })
        },
    )
    .optional()
    .context("load pp aggregate")
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl PpStore for SqliteStore<'_> {
    fn fetch_mode_stats(&self, player_id: PlayerId) -> Result<Vec<ModeStat>> {
        let sql = format!(
            "SELECT mode, pp FROM stats WHERE id = ?1 AND mode IN {}",
            modes::mode_in_clause()
        );
        let mut stmt = self
            .conn
            .prepare_cached(&sql)
            .context("prepare mode stats query")?;

        let rows = stmt
            .query_map(params![player_id], |row| {
                Ok(ModeStat {
                    mode: row.get::<_, u8>(0)?,
                    pp: row.get(1)?,
                })
            })
            .context("query mode stats")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode mode stat row")?);
        }
        debug!(player_id, rows = out.len(), "fetched mode stats");
        Ok(out)
    }

    fn upsert_aggregate(&self, a: &PlayerPpAggregate) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO player_pp_aggregates (
                    player_id,
                    all_modes_total, all_modes_stddev,
                    classic_total, classic_stddev,
                    relax_total, relax_stddev
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(player_id) DO UPDATE SET
                    all_modes_total = excluded.all_modes_total,
                    all_modes_stddev = excluded.all_modes_stddev,
                    classic_total = excluded.classic_total,
                    classic_stddev = excluded.classic_stddev,
                    relax_total = excluded.relax_total,
                    relax_stddev = excluded.relax_stddev
                "#,
                params![
                    a.player_id,
                    a.all_modes_total,
                    a.all_modes_stddev,
                    a.classic_total,
                    a.classic_stddev,
                    a.relax_total,
                    a.relax_stddev,
                ],
            )
            .context("upsert pp aggregate")?;
        debug!(player_id = a.player_id, "upserted pp aggregate");
        Ok(())
    }

    fn delete_aggregate(&self, player_id: PlayerId) -> Result<bool> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM player_pp_aggregates WHERE player_id = ?1",
                params![player_id],
            )
            .context("delete pp aggregate")?;
        debug!(player_id, removed, "deleted pp aggregate");
        Ok(removed > 0)
    }
}
