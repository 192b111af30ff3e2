//! Question like association queries.
//!
//! Read-only, like follows. A user counts once per question however many
//! like rows repeat the pair. `num_likes_for_question_id` is `0` when the
//! question has no likes (or does not exist).

use crate::model::association::QuestionLike;
use crate::model::question::Question;
use crate::model::user::User;
use crate::model::{QuestionId, UserId};
use crate::repo::entity::{count, ensure_forum_ready, find_where, Entity, EntityKind, RepoResult};
use crate::repo::{question_repo, user_repo};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl Entity for QuestionLike {
    const KIND: EntityKind = EntityKind::QuestionLike;
    const COLUMNS: &'static [&'static str] = &["question_id", "user_id"];
    const ORDER_BY: &'static str = "question_id ASC, user_id ASC";

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            question_id: row.get("question_id")?,
            user_id: row.get("user_id")?,
        })
    }
}

/// Read-only queries over question likes.
pub trait QuestionLikeRepository {
    /// Raw like rows for one question.
    fn find_by_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<QuestionLike>>;
    fn likers_for_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<User>>;
    fn num_likes_for_question_id(&self, question_id: QuestionId) -> RepoResult<u64>;
    fn liked_questions_for_user_id(&self, user_id: UserId) -> RepoResult<Vec<Question>>;
    fn most_liked_questions(&self, n: u32) -> RepoResult<Vec<Question>>;
}

/// SQLite-backed like queries.
pub struct SqliteQuestionLikeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionLikeRepository<'conn> {
    /// Constructs a repository after checking the forum tables exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_forum_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuestionLikeRepository for SqliteQuestionLikeRepository<'_> {
    fn find_by_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<QuestionLike>> {
        find_where(self.conn, &[("question_id", Value::Integer(question_id))])
    }

    fn likers_for_question_id(&self, question_id: QuestionId) -> RepoResult<Vec<User>> {
        user_repo::users_linked_to_question(self.conn, EntityKind::QuestionLike, question_id)
    }

    fn num_likes_for_question_id(&self, question_id: QuestionId) -> RepoResult<u64> {
        num_likes_for_question_id(self.conn, question_id)
    }

    fn liked_questions_for_user_id(&self, user_id: UserId) -> RepoResult<Vec<Question>> {
        question_repo::questions_linked_to_user(self.conn, EntityKind::QuestionLike, user_id)
    }

    fn most_liked_questions(&self, n: u32) -> RepoResult<Vec<Question>> {
        question_repo::ranked_questions(self.conn, EntityKind::QuestionLike, n)
    }
}

pub(crate) fn num_likes_for_question_id(
    conn: &Connection,
    question_id: QuestionId,
) -> RepoResult<u64> {
    count(
        conn,
        "SELECT COUNT(DISTINCT user_id) FROM question_likes WHERE question_id = ?1;",
        [question_id],
    )
}
