//! Forum question record.

use super::{QuestionId, UserId};
use serde::{Deserialize, Serialize};

/// A question posted by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuestionId>,
    pub title: String,
    pub body: String,
    /// Author.
    pub user_id: UserId,
}

impl Question {
    /// Creates a transient question authored by `user_id`.
    pub fn new(title: impl Into<String>, body: impl Into<String>, user_id: UserId) -> Self {
        Self {
            id: None,
            title: title.into(),
            body: body.into(),
            user_id,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
