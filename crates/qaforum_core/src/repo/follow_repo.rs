//! Question follow association queries.
//!
//! # Responsibility
//! - Read `question_follows` rows and the users/questions they link.
//! - Rank questions by follower count.
//!
//! # Invariants
//! - Read-only: follow rows are written outside this crate.
//! - `(question_id, user_id)` pairs are unique by convention only; counts,
//!   user/question lists and rankings all treat a repeated pair as one.

use crate::model::association::QuestionFollow;
use crate::model::question::Question;
use crate::model::user::User;
use crate::model::{QuestionId, UserId};
use crate::repo::entity::{count, ensure_forum_ready, find_where, Entity, EntityKind, RepoResult};
use crate::repo::{question_repo, user_repo};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl Entity for QuestionFollow {
    const KIND: EntityKind = EntityKind::QuestionFollow;
    const COLUMNS: &'static [&'static str] = &["question_id", "user_id"];
    const ORDER_BY: &'static str = "question_id ASC, user_id ASC";

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            question_id: row.get("question_id")?,
            user_id: row.get("user_id")?,
        })
    }
}

/// Read-only queries over question follows.
pub trait QuestionFollowRepository {
    /// Raw follow rows for one question.
    fn find_by_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<QuestionFollow>>;
    fn followers_for_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<User>>;
    fn num_followers_for_question_id(&self, question_id: QuestionId) -> RepoResult<u64>;
    fn followed_questions_for_user_id(&self, user_id: UserId) -> RepoResult<Vec<Question>>;
    fn most_followed_questions(&self, n: u32) -> RepoResult<Vec<Question>>;
}

/// SQLite-backed follow queries.
pub struct SqliteQuestionFollowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionFollowRepository<'conn> {
    /// Constructs a repository after checking the forum tables exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_forum_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuestionFollowRepository for SqliteQuestionFollowRepository<'_> {
    fn find_by_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<QuestionFollow>> {
        find_where(self.conn, &[("question_id", Value::Integer(question_id))])
    }

    fn followers_for_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<User>> {
        user_repo::users_linked_to_question(self.conn, EntityKind::QuestionFollow, question_id)
    }

    fn num_followers_for_question_id(&self, question_id: QuestionId) -> RepoResult<u64> {
        count(
            self.conn,
            "SELECT COUNT(DISTINCT user_id) FROM question_follows WHERE question_id = ?1;",
            [question_id],
        )
    }

    fn followed_questions_for_user_id(&self, user_id: UserId) -> RepoResult<Vec<Question>> {
        question_repo::questions_linked_to_user(self.conn, EntityKind::QuestionFollow, user_id)
    }

    fn most_followed_questions(&self, n: u32) -> RepoResult<Vec<Question>> {
        question_repo::ranked_questions(self.conn, EntityKind::QuestionFollow, n)
    }
}
