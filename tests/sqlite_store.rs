use pp_aggregates::sqlite_store::{self, SqliteStore};
use pp_aggregates::{Aggregator, EmptyPolicy, PpStore, RecomputeOutcome};

#[test]
fn fetch_restricts_to_recognized_modes() {
    let conn = sqlite_store::open_in_memory().unwrap();
    for (mode, pp) in [(0, 10.0), (4, 20.0), (7, 30.0), (8, 40.0), (9, 50.0)] {
        sqlite_store::upsert_stat(&conn, 42, mode, pp).unwrap();
    }
    sqlite_store::upsert_stat(&conn, 43, 0, 99.0).unwrap();

    let mut rows = SqliteStore::new(&conn).fetch_mode_stats(42).unwrap();
    rows.sort_by_key(|r| r.mode);
    let modes = rows.iter().map(|r| r.mode).collect::<Vec<_>>();
    assert_eq!(modes, vec![0, 4, 8]);
}

#[test]
fn recompute_persists_relax_only_scenario() {
    let conn = sqlite_store::open_in_memory().unwrap();
    sqlite_store::upsert_stat(&conn, 7, 8, 60.0).unwrap();
    sqlite_store::upsert_stat(&conn, 7, 6, 90.0).unwrap();

    Aggregator::new(SqliteStore::new(&conn)).recompute(7).unwrap();

    let agg = sqlite_store::load_aggregate(&conn, 7).unwrap().expect("row written");
    assert_eq!(agg.classic_total, 0.0);
    assert_eq!(agg.classic_stddev, 0.0);
    assert_eq!(agg.relax_total, 150.0);
    assert_eq!(agg.relax_stddev, 15.0);
    assert_eq!(agg.all_modes_total, 150.0);
    assert_eq!(agg.all_modes_stddev, 15.0);
}

#[test]
fn upsert_overwrites_every_column() {
    let conn = sqlite_store::open_in_memory().unwrap();
    let aggregator = Aggregator::new(SqliteStore::new(&conn));

    sqlite_store::upsert_stat(&conn, 1, 0, 100.0).unwrap();
    sqlite_store::upsert_stat(&conn, 1, 4, 300.0).unwrap();
    aggregator.recompute(1).unwrap();

    sqlite_store::delete_stats(&conn, 1).unwrap();
    sqlite_store::upsert_stat(&conn, 1, 2, 50.0).unwrap();
    aggregator.recompute(1).unwrap();

    let agg = sqlite_store::load_aggregate(&conn, 1).unwrap().unwrap();
    assert_eq!(agg.all_modes_total, 50.0);
    assert_eq!(agg.all_modes_stddev, 0.0);
    assert_eq!(agg.classic_total, 50.0);
    assert_eq!(agg.relax_total, 0.0);
    assert_eq!(agg.relax_stddev, 0.0);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM player_pp_aggregates", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn empty_player_leaves_no_row() {
    let conn = sqlite_store::open_in_memory().unwrap();
    let outcome = Aggregator::new(SqliteStore::new(&conn)).recompute(99).unwrap();
    assert_eq!(outcome, RecomputeOutcome::Skipped);
    assert_eq!(sqlite_store::load_aggregate(&conn, 99).unwrap(), None);
}

#[test]
fn clear_policy_deletes_stale_row() {
    let conn = sqlite_store::open_in_memory().unwrap();
    let aggregator =
        Aggregator::new(SqliteStore::new(&conn)).with_empty_policy(EmptyPolicy::Clear);

    sqlite_store::upsert_stat(&conn, 3, 1, 70.0).unwrap();
    aggregator.recompute(3).unwrap();
    assert!(sqlite_store::load_aggregate(&conn, 3).unwrap().is_some());

    sqlite_store::delete_stats(&conn, 3).unwrap();
    assert_eq!(aggregator.recompute(3).unwrap(), RecomputeOutcome::Cleared(true));
    assert_eq!(sqlite_store::load_aggregate(&conn, 3).unwrap(), None);
}

#[test]
fn missing_table_surfaces_as_error() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = Aggregator::new(SqliteStore::new(&conn))
        .recompute(1)
        .unwrap_err();
    assert!(err.downcast_ref::<rusqlite::Error>().is_some());
}

#[test]
fn open_db_creates_file_backed_schema() {
    let dir = std::env::temp_dir().join(format!("pp_aggregates_test_{}", std::process::id()));
    let path = dir.join("nested").join("stats.sqlite");
    {
        let conn = sqlite_store::open_db(&path).unwrap();
        sqlite_store::upsert_stat(&conn, 5, 3, 12.5).unwrap();
        Aggregator::new(SqliteStore::new(&conn)).recompute(5).unwrap();
    }
    let conn = sqlite_store::open_db(&path).unwrap();
    let agg = sqlite_store::load_aggregate(&conn, 5).unwrap().unwrap();
    assert_eq!(agg.classic_total, 12.5);
    drop(conn);
    let _ = std::fs::remove_dir_all(&dir);
}
