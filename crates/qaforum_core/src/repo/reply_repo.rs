//! Reply repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look replies up by id and by each foreign key.
//! - Walk the reply tree one level at a time (`parent_reply`,
//!   `child_replies`).
//!
//! # Invariants
//! - Tree links are ids resolved through queries; no reply holds another.
//! - A leaf reply has an empty `child_replies` list, never an error.
//! - Same-question parents and acyclic nesting are caller responsibilities.

use crate::model::question::Question;
use crate::model::reply::Reply;
use crate::model::user::User;
use crate::model::{QuestionId, ReplyId, UserId};
use crate::repo::entity::{
    ensure_forum_ready, find_by_id, find_where, log_save, Entity, EntityKind, Identified,
    RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::time::Instant;

impl Entity for Reply {
    const KIND: EntityKind = EntityKind::Reply;
    const COLUMNS: &'static [&'static str] =
        &["id", "body", "question_id", "parent_id", "user_id"];
    const ORDER_BY: &'static str = "id ASC";

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            body: row.get("body")?,
            question_id: row.get("question_id")?,
            parent_id: row.get("parent_id")?,
            user_id: row.get("user_id")?,
        })
    }
}

impl Identified for Reply {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Repository interface for threaded replies.
pub trait ReplyRepository {
    fn find_by_id(&self, id: ReplyId) -> RepoResult<Option<Reply>>;
    fn find_by_parent_id(&self, parent_id: ReplyId) -> RepoResult<Vec<Reply>>;
    fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Reply>>;
    fn find_by_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<Reply>>;
    fn author(&self, reply: &Reply) -> RepoResult<Option<User>>;
    fn question(&self, reply: &Reply) -> RepoResult<Option<Question>>;
    /// `None` for top-level replies.
    fn parent_reply(&self, reply: &Reply) -> RepoResult<Option<Reply>>;
    /// Direct children only.
    fn child_replies(&self, reply: &Reply) -> RepoResult<Vec<Reply>>;
    /// Update path rewrites `body`, `question_id`, `parent_id` and `user_id`.
    fn save(&self, reply: &mut Reply) -> RepoResult<ReplyId>;
}

/// SQLite-backed reply repository.
pub struct SqliteReplyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReplyRepository<'conn> {
    /// Constructs a repository after checking the forum tables exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_forum_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ReplyRepository for SqliteReplyRepository<'_> {
    fn find_by_id(&self, id: ReplyId) -> RepoResult<Option<Reply>> {
        find_by_id(self.conn, id)
    }

    fn find_by_parent_id(&self, parent_id: ReplyId) -> RepoResult<Vec<Reply>> {
        find_by_parent_id(self.conn, parent_id)
    }

    fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Reply>> {
        find_by_user_id(self.conn, user_id)
    }

    fn find_by_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<Reply>> {
        find_by_question_id(self.conn, question_id)
    }

    fn author(&self, reply: &Reply) -> RepoResult<Option<User>> {
        find_by_id(self.conn, reply.user_id)
    }

    fn question(&self, reply: &Reply) -> RepoResult<Option<Question>> {
        find_by_id(self.conn, reply.question_id)
    }

    fn parent_reply(&self, reply: &Reply) -> RepoResult<Option<Reply>> {
        match reply.parent_id {
            Some(parent_id) => find_by_id(self.conn, parent_id),
            None => Ok(None),
        }
    }

    fn child_replies(&self, reply: &Reply) -> RepoResult<Vec<Reply>> {
        find_by_parent_id(self.conn, reply.require_id()?)
    }

    fn save(&self, reply: &mut Reply) -> RepoResult<ReplyId> {
        let started_at = Instant::now();
        match reply.id {
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE replies
                     SET
                        body = ?1,
                        question_id = ?2,
                        parent_id = ?3,
                        user_id = ?4
                     WHERE id = ?5;",
                    params![
                        reply.body.as_str(),
                        reply.question_id,
                        reply.parent_id,
                        reply.user_id,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        kind: EntityKind::Reply,
                        id,
                    });
                }
                log_save(EntityKind::Reply, "update", id, started_at);
                Ok(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO replies (
                        body,
                        question_id,
                        parent_id,
                        user_id
                    ) VALUES (?1, ?2, ?3, ?4);",
                    params![
                        reply.body.as_str(),
                        reply.question_id,
                        reply.parent_id,
                        reply.user_id,
                    ],
                )?;
                let id = self.conn.last_insert_rowid();
                reply.id = Some(id);
                log_save(EntityKind::Reply, "insert", id, started_at);
                Ok(id)
            }
        }
    }
}

fn find_by_parent_id(conn: &Connection, parent_id: ReplyId) -> RepoResult<Vec<Reply>> {
    find_where(conn, &[("parent_id", Value::Integer(parent_id))])
}

pub(crate) fn find_by_user_id(conn: &Connection, user_id: UserId) -> RepoResult<Vec<Reply>> {
    find_where(conn, &[("user_id", Value::Integer(user_id))])
}

pub(crate) fn find_by_question_id(
    conn: &Connection,
    question_id: QuestionId,
) -> RepoResult<Vec<Reply>> {
    find_where(conn, &[("question_id", Value::Integer(question_id))])
}
