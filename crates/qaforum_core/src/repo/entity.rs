//! Shared lookup and row materialization for forum entities.
//!
//! # Responsibility
//! - Map each entity kind to its table through an explicit static table.
//! - Build single-table `SELECT`s with every value bound as a parameter.
//! - Materialize rows into typed records by column name.
//!
//! # Invariants
//! - Column names in SQL come from `Entity::COLUMNS` constants only.
//! - Caller-supplied values are always bound (`?N`), never interpolated.
//! - Multi-row finders return rows in `Entity::ORDER_BY` order.

use crate::db::schema::{table_exists, table_has_column};
use crate::db::DbError;
use crate::model::association::{QuestionFollow, QuestionLike};
use crate::model::question::Question;
use crate::model::reply::Reply;
use crate::model::user::User;
use log::info;
use rusqlite::types::{ToSql, Value};
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter, Write};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Forum entity kinds and their backing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Question,
    Reply,
    QuestionFollow,
    QuestionLike,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        Self::User,
        Self::Question,
        Self::Reply,
        Self::QuestionFollow,
        Self::QuestionLike,
    ];

    /// Backing table: the kind name, snake_cased and pluralized.
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Question => "questions",
            Self::Reply => "replies",
            Self::QuestionFollow => "question_follows",
            Self::QuestionLike => "question_likes",
        }
    }

    /// Singular snake_case name used in logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Question => "question",
            Self::Reply => "reply",
            Self::QuestionFollow => "question_follow",
            Self::QuestionLike => "question_like",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Repository error for forum persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store transport or statement failure.
    Db(DbError),
    /// Update targeted an id with no row.
    NotFound { kind: EntityKind, id: i64 },
    /// Operation needs a store id but the record was never saved.
    NotPersisted(EntityKind),
    /// Persisted value cannot be represented by the read model.
    InvalidData(String),
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::NotPersisted(kind) => write!(f, "{kind} has not been saved yet"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "forum repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "forum repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::NotPersisted(_) => None,
            Self::InvalidData(_) => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A record type stored as one row of one forum table.
pub trait Entity: Sized {
    const KIND: EntityKind;
    /// Declared field set, in table order.
    const COLUMNS: &'static [&'static str];
    /// Deterministic ordering for multi-row results.
    const ORDER_BY: &'static str;

    /// Builds a record from a row that selected exactly `COLUMNS`.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Entity with its own integer primary key named `id`.
pub trait Identified: Entity {
    fn id(&self) -> Option<i64>;

    /// Returns the id, or `NotPersisted` for a transient record.
    fn require_id(&self) -> RepoResult<i64> {
        self.id().ok_or(RepoError::NotPersisted(Self::KIND))
    }
}

/// `SELECT <columns> FROM <table>` for `E`.
pub fn select_sql<E: Entity>() -> String {
    format!(
        "SELECT {} FROM {}",
        E::COLUMNS.join(", "),
        E::KIND.table_name()
    )
}

/// Comma-separated `alias.column` list, for joins that return `E` rows.
pub fn qualified_columns<E: Entity>(alias: &str) -> String {
    E::COLUMNS
        .iter()
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loads the row with primary key `id`.
pub fn find_by_id<E: Identified>(conn: &Connection, id: i64) -> RepoResult<Option<E>> {
    let mut found = find_where::<E>(conn, &[("id", Value::Integer(id))])?;
    Ok(found.pop())
}

/// Loads every row matching all `column = value` filters.
///
/// Column names must be members of `E::COLUMNS`.
pub fn find_where<E: Entity>(
    conn: &Connection,
    filters: &[(&'static str, Value)],
) -> RepoResult<Vec<E>> {
    let mut sql = select_sql::<E>();
    for (index, (column, _)) in filters.iter().enumerate() {
        debug_assert!(
            E::COLUMNS.contains(column),
            "column `{column}` is not declared by {}",
            E::KIND
        );
        let keyword = if index == 0 { " WHERE " } else { " AND " };
        // Writing to a String cannot fail.
        let _ = write!(sql, "{keyword}{column} = ?{}", index + 1);
    }
    let _ = write!(sql, " ORDER BY {};", E::ORDER_BY);

    query_entities(conn, &sql, filters.iter().map(|(_, value)| value))
}

/// Runs `sql` and materializes each row as `E`.
///
/// `sql` must select exactly `E::COLUMNS`, by name.
pub fn query_entities<E, P>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<E>>
where
    E: Entity,
    P: IntoIterator,
    P::Item: ToSql,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(params))?;
    let mut entities = Vec::new();
    while let Some(row) = rows.next()? {
        entities.push(E::from_row(row)?);
    }
    Ok(entities)
}

/// Runs a single-value `COUNT` query and converts it to `u64`.
pub fn count<P>(conn: &Connection, sql: &str, params: P) -> RepoResult<u64>
where
    P: rusqlite::Params,
{
    let value: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` from store")))
}

/// Verifies the table and every declared column of `E` exist.
pub fn ensure_entity_ready<E: Entity>(conn: &Connection) -> RepoResult<()> {
    let table = E::KIND.table_name();
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in E::COLUMNS {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

/// Verifies every forum table a repository may read through.
///
/// Accessors cross entity boundaries (a user lists questions, a question
/// lists likers), so each repository checks the full table set up front.
pub fn ensure_forum_ready(conn: &Connection) -> RepoResult<()> {
    ensure_entity_ready::<User>(conn)?;
    ensure_entity_ready::<Question>(conn)?;
    ensure_entity_ready::<Reply>(conn)?;
    ensure_entity_ready::<QuestionFollow>(conn)?;
    ensure_entity_ready::<QuestionLike>(conn)?;
    Ok(())
}

pub(crate) fn log_save(kind: EntityKind, op: &'static str, id: i64, started_at: Instant) {
    info!(
        "event=entity_save module=repo status=ok entity={kind} op={op} id={id} duration_ms={}",
        started_at.elapsed().as_millis()
    );
}
