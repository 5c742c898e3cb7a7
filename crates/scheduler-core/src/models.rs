use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Store-assigned task identifier.
///
/// On the wire it travels as a numeric string (`"42"`); it is parsed once at
/// the boundary and carried as a typed value from there on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type)]
#[derive(Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(value: i64) -> Result<Self, CoreError> {
        if value < 1 {
            return Err(CoreError::InvalidId(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl FromStr for TaskId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.parse().map_err(|_| CoreError::InvalidId(s.to_string()))?;
        Self::new(value).map_err(|_| CoreError::InvalidId(s.to_string()))
    }
}

impl TryFrom<String> for TaskId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scheduled task as stored.
///
/// `date` is always a valid `YYYYMMDD` date while at rest and `repeat`, when
/// non-empty, held a valid recurrence rule when it was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: TaskId,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Input for creating a task. A missing or empty `date` means today.
#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub date: Option<String>,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Input for replacing every mutable field of an existing task.
#[derive(Debug, Clone)]
pub struct UpdateTaskData {
    pub id: TaskId,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Validated fields of a task that has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Outcome of marking a task done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// One-off task, removed from the store.
    Deleted(TaskId),
    /// Recurring task, kept with its date moved to the next occurrence.
    Rescheduled(Task),
}
