//! Question repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look questions up by id and author.
//! - Resolve author, replies, followers and likers on demand.
//! - Rank questions by follower and like counts.
//!
//! # Invariants
//! - Rankings order by `COUNT(DISTINCT user_id)` per question, then by id.
//! - Questions without any association row are not ranked.
//! - Repeated association pairs count once in lists, counts and rankings.
//! - `num_likes` is `0` when no like rows exist.

use crate::model::question::Question;
use crate::model::reply::Reply;
use crate::model::user::User;
use crate::model::{QuestionId, UserId};
use crate::repo::entity::{
    ensure_forum_ready, find_by_id, find_where, log_save, qualified_columns, query_entities,
    Entity, EntityKind, Identified, RepoError, RepoResult,
};
use crate::repo::{like_repo, reply_repo, user_repo};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::time::Instant;

impl Entity for Question {
    const KIND: EntityKind = EntityKind::Question;
    const COLUMNS: &'static [&'static str] = &["id", "title", "body", "user_id"];
    const ORDER_BY: &'static str = "id ASC";

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            title: row.get("title")?,
            body: row.get("body")?,
            user_id: row.get("user_id")?,
        })
    }
}

impl Identified for Question {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Repository interface for questions.
pub trait QuestionRepository {
    fn find_by_id(&self, id: QuestionId) -> RepoResult<Option<Question>>;
    fn find_by_author_id(&self, user_id: UserId) -> RepoResult<Vec<Question>>;
    /// `None` only when the author row is missing.
    fn author(&self, question: &Question) -> RepoResult<Option<User>>;
    fn replies(&self, question: &Question) -> RepoResult<Vec<Reply>>;
    fn followers(&self, question: &Question) -> RepoResult<Vec<User>>;
    fn likers(&self, question: &Question) -> RepoResult<Vec<User>>;
    fn num_likes(&self, question: &Question) -> RepoResult<u64>;
    /// At most `n` questions, most followers first.
    fn most_followed(&self, n: u32) -> RepoResult<Vec<Question>>;
    /// At most `n` questions, most likes first.
    fn most_liked(&self, n: u32) -> RepoResult<Vec<Question>>;
    fn save(&self, question: &mut Question) -> RepoResult<QuestionId>;
}

/// SQLite-backed question repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    /// Constructs a repository after checking the forum tables exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_forum_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn find_by_id(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        find_by_id(self.conn, id)
    }

    fn find_by_author_id(&self, user_id: UserId) -> RepoResult<Vec<Question>> {
        find_by_author_id(self.conn, user_id)
    }

    fn author(&self, question: &Question) -> RepoResult<Option<User>> {
        find_by_id(self.conn, question.user_id)
    }

    fn replies(&self, question: &Question) -> RepoResult<Vec<Reply>> {
        reply_repo::find_by_question_id(self.conn, question.require_id()?)
    }

    fn followers(&self, question: &Question) -> RepoResult<Vec<User>> {
        user_repo::users_linked_to_question(
            self.conn,
            EntityKind::QuestionFollow,
            question.require_id()?,
        )
    }

    fn likers(&self, question: &Question) -> RepoResult<Vec<User>> {
        user_repo::users_linked_to_question(
            self.conn,
            EntityKind::QuestionLike,
            question.require_id()?,
        )
    }

    fn num_likes(&self, question: &Question) -> RepoResult<u64> {
        like_repo::num_likes_for_question_id(self.conn, question.require_id()?)
    }

    fn most_followed(&self, n: u32) -> RepoResult<Vec<Question>> {
        ranked_questions(self.conn, EntityKind::QuestionFollow, n)
    }

    fn most_liked(&self, n: u32) -> RepoResult<Vec<Question>> {
        ranked_questions(self.conn, EntityKind::QuestionLike, n)
    }

    fn save(&self, question: &mut Question) -> RepoResult<QuestionId> {
        let started_at = Instant::now();
        match question.id {
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE questions
                     SET
                        title = ?1,
                        body = ?2,
                        user_id = ?3
                     WHERE id = ?4;",
                    params![
                        question.title.as_str(),
                        question.body.as_str(),
                        question.user_id,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        kind: EntityKind::Question,
                        id,
                    });
                }
                log_save(EntityKind::Question, "update", id, started_at);
                Ok(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO questions (title, body, user_id) VALUES (?1, ?2, ?3);",
                    params![
                        question.title.as_str(),
                        question.body.as_str(),
                        question.user_id,
                    ],
                )?;
                let id = self.conn.last_insert_rowid();
                question.id = Some(id);
                log_save(EntityKind::Question, "insert", id, started_at);
                Ok(id)
            }
        }
    }
}

pub(crate) fn find_by_author_id(conn: &Connection, user_id: UserId) -> RepoResult<Vec<Question>> {
    find_where(conn, &[("user_id", Value::Integer(user_id))])
}

/// Questions linked to `user_id` through a follow or like association.
pub(crate) fn questions_linked_to_user(
    conn: &Connection,
    association: EntityKind,
    user_id: UserId,
) -> RepoResult<Vec<Question>> {
    debug_assert!(matches!(
        association,
        EntityKind::QuestionFollow | EntityKind::QuestionLike
    ));
    let sql = format!(
        "SELECT DISTINCT {}
         FROM questions q
         INNER JOIN {} a ON a.question_id = q.id
         WHERE a.user_id = ?1
         ORDER BY q.id ASC;",
        qualified_columns::<Question>("q"),
        association.table_name()
    );
    query_entities(conn, &sql, [user_id])
}

/// Top `limit` questions by distinct associated users, ties broken by id.
pub(crate) fn ranked_questions(
    conn: &Connection,
    association: EntityKind,
    limit: u32,
) -> RepoResult<Vec<Question>> {
    debug_assert!(matches!(
        association,
        EntityKind::QuestionFollow | EntityKind::QuestionLike
    ));
    let sql = format!(
        "SELECT {}
         FROM questions q
         INNER JOIN {} a ON a.question_id = q.id
         GROUP BY q.id
         ORDER BY COUNT(DISTINCT a.user_id) DESC, q.id ASC
         LIMIT ?1;",
        qualified_columns::<Question>("q"),
        association.table_name()
    );
    let ranked: Vec<Question> = query_entities(conn, &sql, [i64::from(limit)])?;
    debug!(
        "event=ranking_query module=repo status=ok by={association} limit={limit} rows={}",
        ranked.len()
    );
    Ok(ranked)
}
