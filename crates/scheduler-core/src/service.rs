//! Task lifecycle: validation, date defaulting and the completion transition.

use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime};
use mockable::Clock;

use crate::dates::{format_date, parse_date, parse_search_date};
use crate::error::CoreError;
use crate::models::{CompletionResult, NewTask, NewTaskData, Task, TaskId, UpdateTaskData};
use crate::recurrence;
use crate::repository::TaskRepository;

/// Orchestrates task operations over an injected repository and clock.
///
/// Holds no mutable state of its own; concurrent callers are serialized only
/// by the repository.
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync + ?Sized,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync + ?Sized,
{
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.local().naive_local()
    }

    /// Evaluates a rule against an explicit `now` given as `YYYYMMDD`.
    pub fn next_date(&self, now: &str, date: &str, repeat: &str) -> Result<String, CoreError> {
        let now = parse_date(now)?.and_time(NaiveTime::MIN);
        Ok(recurrence::next_date(now, date, repeat)?)
    }

    /// Creates a task and returns its new id.
    ///
    /// A missing date becomes today and a past date is bumped to today. The
    /// repeat rule is only validated here; creation never pre-advances.
    pub async fn create(&self, data: NewTaskData) -> Result<TaskId, CoreError> {
        let now = self.now();
        let today = now.date();

        let date = match data.date.filter(|d| !d.is_empty()) {
            None => format_date(today),
            Some(raw) => {
                if parse_date(&raw)? < today {
                    format_date(today)
                } else {
                    raw
                }
            }
        };

        if data.title.is_empty() {
            return Err(CoreError::MissingTitle);
        }

        if !data.repeat.is_empty() {
            recurrence::next_date(now, &date, &data.repeat)?;
        }

        let id = self
            .repository
            .insert(&NewTask {
                date,
                title: data.title,
                comment: data.comment,
                repeat: data.repeat,
            })
            .await?;

        tracing::info!(%id, "task created");
        Ok(id)
    }

    pub async fn get(&self, id: TaskId) -> Result<Task, CoreError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound(id))
    }

    /// Lists tasks, optionally filtered.
    ///
    /// A `DD.MM.YYYY` search term selects tasks on that exact day; any other
    /// non-empty term is matched against title and comment.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Task>, CoreError> {
        match search.filter(|s| !s.is_empty()) {
            None => self.repository.list().await,
            Some(term) => match parse_search_date(term) {
                Some(date) => self.repository.search_by_date(&format_date(date)).await,
                None => self.repository.search_text(term).await,
            },
        }
    }

    /// Replaces a task's fields. Unlike [`create`](Self::create), a past date
    /// is stored exactly as given.
    pub async fn update(&self, data: UpdateTaskData) -> Result<Task, CoreError> {
        parse_date(&data.date)?;

        if data.title.is_empty() {
            return Err(CoreError::MissingTitle);
        }

        if !data.repeat.is_empty() {
            recurrence::next_date(self.now(), &data.date, &data.repeat)?;
        }

        let task = Task {
            id: data.id,
            date: data.date,
            title: data.title,
            comment: data.comment,
            repeat: data.repeat,
        };
        self.repository.update(&task).await?;

        tracing::info!(id = %task.id, "task updated");
        Ok(task)
    }

    /// Marks a task done: one-off tasks are deleted, recurring ones move to
    /// their next occurrence. A rule that fails to evaluate leaves the task
    /// untouched.
    pub async fn complete(&self, id: TaskId) -> Result<CompletionResult, CoreError> {
        let task = self.get(id).await?;

        if task.repeat.is_empty() {
            self.repository.delete(id).await?;
            tracing::info!(%id, "one-off task completed and removed");
            return Ok(CompletionResult::Deleted(id));
        }

        let next = recurrence::next_date(self.now(), &task.date, &task.repeat)?;
        let rescheduled = Task { date: next, ..task };
        self.repository.update(&rescheduled).await?;

        tracing::info!(%id, date = %rescheduled.date, "recurring task rescheduled");
        Ok(CompletionResult::Rescheduled(rescheduled))
    }

    pub async fn delete(&self, id: TaskId) -> Result<(), CoreError> {
        self.repository.delete(id).await?;
        tracing::info!(%id, "task deleted");
        Ok(())
    }
}
