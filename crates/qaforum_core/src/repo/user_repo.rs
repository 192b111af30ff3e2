//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look users up by id and by exact name.
//! - Resolve a user's authored, followed and liked content lazily.
//! - Persist users with insert-or-update `save` semantics.
//!
//! # Invariants
//! - Accessors that key on the user's id reject transient users.
//! - `average_karma` is `None`, not NaN, for users with no questions.

use crate::model::question::Question;
use crate::model::reply::Reply;
use crate::model::user::User;
use crate::model::{QuestionId, UserId};
use crate::repo::entity::{
    ensure_forum_ready, find_by_id, find_where, log_save, qualified_columns, query_entities,
    Entity, EntityKind, Identified, RepoError, RepoResult,
};
use crate::repo::{question_repo, reply_repo};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::time::Instant;

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    const COLUMNS: &'static [&'static str] = &["id", "fname", "lname"];
    const ORDER_BY: &'static str = "id ASC";

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            fname: row.get("fname")?,
            lname: row.get("lname")?,
        })
    }
}

impl Identified for User {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Repository interface for user lookups, traversal and persistence.
pub trait UserRepository {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Exact, case-sensitive match on both name parts.
    fn find_by_name(&self, fname: &str, lname: &str) -> RepoResult<Vec<User>>;
    fn authored_questions(&self, user: &User) -> RepoResult<Vec<Question>>;
    fn authored_replies(&self, user: &User) -> RepoResult<Vec<Reply>>;
    fn followed_questions(&self, user: &User) -> RepoResult<Vec<Question>>;
    fn liked_questions(&self, user: &User) -> RepoResult<Vec<Question>>;
    /// Likes received across all authored questions, per authored question.
    fn average_karma(&self, user: &User) -> RepoResult<Option<f64>>;
    /// Inserts a transient user or updates a persisted one; returns its id.
    fn save(&self, user: &mut User) -> RepoResult<UserId>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository after checking the forum tables exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_forum_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        find_by_id(self.conn, id)
    }

    fn find_by_name(&self, fname: &str, lname: &str) -> RepoResult<Vec<User>> {
        find_where(
            self.conn,
            &[
                ("fname", Value::Text(fname.to_string())),
                ("lname", Value::Text(lname.to_string())),
            ],
        )
    }

    fn authored_questions(&self, user: &User) -> RepoResult<Vec<Question>> {
        question_repo::find_by_author_id(self.conn, user.require_id()?)
    }

    fn authored_replies(&self, user: &User) -> RepoResult<Vec<Reply>> {
        reply_repo::find_by_user_id(self.conn, user.require_id()?)
    }

    fn followed_questions(&self, user: &User) -> RepoResult<Vec<Question>> {
        question_repo::questions_linked_to_user(
            self.conn,
            EntityKind::QuestionFollow,
            user.require_id()?,
        )
    }

    fn liked_questions(&self, user: &User) -> RepoResult<Vec<Question>> {
        question_repo::questions_linked_to_user(
            self.conn,
            EntityKind::QuestionLike,
            user.require_id()?,
        )
    }

    fn average_karma(&self, user: &User) -> RepoResult<Option<f64>> {
        let user_id = user.require_id()?;
        // SQLite yields NULL for division by zero, which maps to `None`.
        let karma = self.conn.query_row(
            "SELECT CAST(SUM(likes) AS REAL) / COUNT(*)
             FROM (
                SELECT COUNT(DISTINCT ql.user_id) AS likes
                FROM questions q
                LEFT JOIN question_likes ql ON ql.question_id = q.id
                WHERE q.user_id = ?1
                GROUP BY q.id
             );",
            [user_id],
            |row| row.get::<_, Option<f64>>(0),
        )?;
        Ok(karma)
    }

    fn save(&self, user: &mut User) -> RepoResult<UserId> {
        let started_at = Instant::now();
        match user.id {
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE users
                     SET
                        fname = ?1,
                        lname = ?2
                     WHERE id = ?3;",
                    params![user.fname.as_str(), user.lname.as_str(), id],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        kind: EntityKind::User,
                        id,
                    });
                }
                log_save(EntityKind::User, "update", id, started_at);
                Ok(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO users (fname, lname) VALUES (?1, ?2);",
                    params![user.fname.as_str(), user.lname.as_str()],
                )?;
                let id = self.conn.last_insert_rowid();
                user.id = Some(id);
                log_save(EntityKind::User, "insert", id, started_at);
                Ok(id)
            }
        }
    }
}

/// Users linked to `question_id` through a follow or like association.
pub(crate) fn users_linked_to_question(
    conn: &Connection,
    association: EntityKind,
    question_id: QuestionId,
) -> RepoResult<Vec<User>> {
    debug_assert!(matches!(
        association,
        EntityKind::QuestionFollow | EntityKind::QuestionLike
    ));
    let sql = format!(
        "SELECT DISTINCT {}
         FROM users u
         INNER JOIN {} a ON a.user_id = u.id
         WHERE a.question_id = ?1
         ORDER BY u.id ASC;",
        qualified_columns::<User>("u"),
        association.table_name()
    );
    query_entities(conn, &sql, [question_id])
}
