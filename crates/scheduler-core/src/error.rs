use thiserror::Error;

use crate::models::TaskId;

/// Reasons a recurrence rule cannot be evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("repeat rule is empty")]
    EmptyRule,

    #[error("invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("repeat rule 'd' requires a day interval")]
    MissingDayParam,

    #[error("repeat rule has a non-numeric day interval: '{0}'")]
    NonNumericDay(String),

    #[error("repeat rule day interval {0} exceeds the maximum of 400")]
    DayIntervalTooLarge(i64),

    #[error("repeat rule day interval must be at least 1")]
    DayIntervalNotPositive,

    #[error("unsupported repeat rule: '{0}'")]
    UnsupportedRuleKind(String),

    #[error("next occurrence falls after the year 9999")]
    DateOutOfRange,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("Task title must not be empty")]
    MissingTitle,

    #[error("Invalid task id: '{0}'")]
    InvalidId(String),

    #[error("Task not found: {0}")]
    NotFound(TaskId),
}

impl CoreError {
    /// True for failures caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Recurrence(_)
                | CoreError::InvalidDate(_)
                | CoreError::MissingTitle
                | CoreError::InvalidId(_)
        )
    }
}
