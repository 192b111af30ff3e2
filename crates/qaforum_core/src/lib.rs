//! Core mapping layer for the question-and-answer forum.
//! Users, questions, threaded replies, follows and likes over SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbHandle, DbLocation, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::association::{QuestionFollow, QuestionLike};
pub use model::question::Question;
pub use model::reply::Reply;
pub use model::user::User;
pub use model::{QuestionId, ReplyId, UserId};
pub use repo::entity::{Entity, EntityKind, Identified, RepoError, RepoResult};
pub use repo::follow_repo::{QuestionFollowRepository, SqliteQuestionFollowRepository};
pub use repo::like_repo::{QuestionLikeRepository, SqliteQuestionLikeRepository};
pub use repo::question_repo::{QuestionRepository, SqliteQuestionRepository};
pub use repo::reply_repo::{ReplyRepository, SqliteReplyRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
