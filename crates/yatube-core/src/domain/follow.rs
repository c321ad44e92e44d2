use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Follow entity - a directed subscription from `user_id` to `author_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: i32,
    pub user_id: i32,
    pub author_id: i32,
}

/// A follow edge that passed the domain checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFollow {
    user_id: i32,
    author_id: i32,
}

impl NewFollow {
    /// Users cannot follow themselves.
    pub fn new(user_id: i32, author_id: i32) -> Result<Self, DomainError> {
        if user_id == author_id {
            return Err(DomainError::Validation(
                "Users cannot follow themselves".to_string(),
            ));
        }
        Ok(Self { user_id, author_id })
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn author_id(&self) -> i32 {
        self.author_id
    }
}
