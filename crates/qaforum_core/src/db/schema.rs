//! Fixed forum schema and its read-side guards.
//!
//! # Responsibility
//! - Create the five forum tables when absent.
//! - Let repositories verify the columns they materialize before use.
//!
//! # Invariants
//! - Table and column names passed to the guards are bound, never
//!   interpolated into SQL.
//! - Bootstrap is idempotent (`CREATE ... IF NOT EXISTS`).

use super::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables owned by the forum store, in dependency order.
pub const TABLES: [&str; 5] = [
    "users",
    "questions",
    "replies",
    "question_follows",
    "question_likes",
];

/// Creates any missing forum table or index.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns whether `table` has a column named `column`.
///
/// Both names are bound; an unknown table reports no columns.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM pragma_table_info(?1)
            WHERE name = ?2
        );",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
