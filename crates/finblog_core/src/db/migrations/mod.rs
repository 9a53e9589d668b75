//! Ordered schema history for the content store.
//!
//! # Invariants
//! - Versions are contiguous from 1 and never renumbered.
//! - Each step bumps `PRAGMA user_version` inside the same transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

impl Migration {
    fn apply(&self, tx: &Transaction<'_>) -> DbResult<()> {
        tx.execute_batch(self.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", self.version))
            .map_err(|source| DbError::Migration {
                version: self.version,
                name: self.name,
                source,
            })
    }
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "content",
        sql: include_str!("0001_content.sql"),
    },
    Migration {
        version: 2,
        name: "reserved",
        sql: include_str!("0002_reserved.sql"),
    },
    Migration {
        version: 3,
        name: "selection_indexes",
        sql: include_str!("0003_selection_indexes.sql"),
    },
];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in the database header.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`], all steps or none.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        migration.apply(&tx)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from={from} to={latest} steps={}",
        pending.len()
    );
    Ok(())
}
