//! Ordered schema steps for the worker store.
//!
//! Step 1 creates the four entity tables, step 2 adds the task lookup indexes
//! used by the count queries, step 3 rescales date columns from epoch
//! milliseconds to epoch nanoseconds.
//!
//! The schema version lives in `PRAGMA user_version`; every pending step runs
//! inside one transaction, so a database is never left between versions.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

/// `(version, sql)` pairs in ascending version order.
const SCHEMA_STEPS: [(u32, &str); 3] = [
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_task_indexes.sql")),
    (3, include_str!("0003_nanosecond_dates.sql")),
];

/// Highest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the schema up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   build; nothing is changed in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let to = latest_version();

    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }
    if from == to {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in SCHEMA_STEPS.iter().filter(|(version, _)| *version > from) {
        run_step(&tx, *version, sql)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={to}");
    Ok(())
}

fn run_step(tx: &Transaction<'_>, version: u32, sql: &str) -> DbResult<()> {
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    Ok(())
}
