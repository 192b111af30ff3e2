//! Threaded reply record.
//!
//! # Invariants
//! - `parent_id == None` marks a top-level reply.
//! - A non-null `parent_id` should name a reply on the same question and
//!   must not make the reply its own ancestor. Neither rule is checked here.

use super::{QuestionId, ReplyId, UserId};
use serde::{Deserialize, Serialize};

/// A reply to a question, optionally nested under another reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReplyId>,
    pub body: String,
    pub question_id: QuestionId,
    pub parent_id: Option<ReplyId>,
    /// Author.
    pub user_id: UserId,
}

impl Reply {
    /// Creates a transient top-level reply.
    pub fn new(body: impl Into<String>, question_id: QuestionId, user_id: UserId) -> Self {
        Self {
            id: None,
            body: body.into(),
            question_id,
            parent_id: None,
            user_id,
        }
    }

    /// Creates a transient reply nested under `parent`.
    ///
    /// Inherits the parent's `question_id`. Returns `None` when `parent`
    /// has not been saved yet, since there is no id to point at.
    pub fn new_child(body: impl Into<String>, parent: &Reply, user_id: UserId) -> Option<Self> {
        let parent_id = parent.id?;
        Some(Self {
            id: None,
            body: body.into(),
            question_id: parent.question_id,
            parent_id: Some(parent_id),
            user_id,
        })
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
