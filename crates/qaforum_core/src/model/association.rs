//! Question/user association rows.
//!
//! Both types are keyed by the `(question_id, user_id)` pair and have no id
//! of their own. They are read-only in this crate.

use super::{QuestionId, UserId};
use serde::{Deserialize, Serialize};

/// `user_id` follows `question_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionFollow {
    pub question_id: QuestionId,
    pub user_id: UserId,
}

/// `user_id` liked `question_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionLike {
    pub question_id: QuestionId,
    pub user_id: UserId,
}
