use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned row identity. Never reused once handed out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Sets `completed` on an existing row. Text is immutable after creation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateTodo {
    pub id: TodoId,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeleteTodo {
    pub id: TodoId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub success: bool,
}
