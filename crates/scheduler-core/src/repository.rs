use async_trait::async_trait;

use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{NewTask, Task, TaskId};

/// Persistence contract consumed by the task service.
///
/// Every list-returning operation orders by `date` ascending.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns the identifier assigned to it.
    async fn insert(&self, task: &NewTask) -> Result<TaskId, CoreError>;

    /// Returns `None` when no task has the given id.
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, CoreError>;

    async fn list(&self) -> Result<Vec<Task>, CoreError>;

    /// Tasks whose title or comment contains `needle`, using SQL `LIKE`
    /// matching (ASCII case-insensitive, `%` and `_` act as wildcards).
    async fn search_text(&self, needle: &str) -> Result<Vec<Task>, CoreError>;

    /// Tasks scheduled exactly on `date` (`YYYYMMDD`).
    async fn search_by_date(&self, date: &str) -> Result<Vec<Task>, CoreError>;

    /// Replaces every mutable field of the task with the same id.
    ///
    /// Returns [`CoreError::NotFound`] when no row matched.
    async fn update(&self, task: &Task) -> Result<(), CoreError>;

    /// Returns [`CoreError::NotFound`] when no row matched.
    async fn delete(&self, id: TaskId) -> Result<(), CoreError>;
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteRepository {
    async fn insert(&self, task: &NewTask) -> Result<TaskId, CoreError> {
        let result = sqlx::query(
            r#"INSERT INTO scheduler (date, title, comment, repeat)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&task.date)
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .execute(&self.pool)
        .await?;

        TaskId::new(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as(
            "SELECT id, date, title, comment, repeat FROM scheduler WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            "SELECT id, date, title, comment, repeat FROM scheduler ORDER BY date, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn search_text(&self, needle: &str) -> Result<Vec<Task>, CoreError> {
        let mut pattern = String::with_capacity(needle.len() + 2);
        pattern.push('%');
        pattern.push_str(needle);
        pattern.push('%');

        let tasks = sqlx::query_as(
            r#"SELECT id, date, title, comment, repeat FROM scheduler
            WHERE title LIKE $1 OR comment LIKE $1
            ORDER BY date, id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn search_by_date(&self, date: &str) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            "SELECT id, date, title, comment, repeat FROM scheduler WHERE date = $1 ORDER BY id",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> Result<(), CoreError> {
        let result = sqlx::query(
            r#"UPDATE scheduler
            SET date = $1, title = $2, comment = $3, repeat = $4
            WHERE id = $5
            "#,
        )
        .bind(&task.date)
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(task.id));
        }
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::establish_connection;
    use tempfile::TempDir;

    async fn setup() -> (SqliteRepository, TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("scheduler.db");
        let pool = establish_connection(&db_path.to_string_lossy()).await.unwrap();
        (SqliteRepository::new(pool), temp_dir)
    }

    fn new_task(date: &str, title: &str, comment: &str) -> NewTask {
        NewTask {
            date: date.to_string(),
            title: title.to_string(),
            comment: comment.to_string(),
            repeat: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (repo, _dir) = setup().await;
        let id = repo
            .insert(&new_task("20240105", "Dentist", "10:30"))
            .await
            .unwrap();

        let task = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.date, "20240105");
        assert_eq!(task.title, "Dentist");
        assert_eq!(task.comment, "10:30");
        assert_eq!(task.repeat, "");
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (repo, _dir) = setup().await;
        let first = repo.insert(&new_task("20240101", "a", "")).await.unwrap();
        let second = repo.insert(&new_task("20240101", "b", "")).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let (repo, _dir) = setup().await;
        let missing = TaskId::new(999).unwrap();
        assert!(repo.find_by_id(missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_date() {
        let (repo, _dir) = setup().await;
        repo.insert(&new_task("20240310", "third", "")).await.unwrap();
        repo.insert(&new_task("20240101", "first", "")).await.unwrap();
        repo.insert(&new_task("20240205", "second", "")).await.unwrap();

        let titles: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (repo, _dir) = setup().await;
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_text_matches_title_or_comment() {
        let (repo, _dir) = setup().await;
        repo.insert(&new_task("20240302", "Buy milk", "")).await.unwrap();
        repo.insert(&new_task("20240301", "Groceries", "milk and bread")).await.unwrap();
        repo.insert(&new_task("20240303", "Gym", "legs")).await.unwrap();

        let titles: Vec<String> = repo
            .search_text("milk")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Groceries", "Buy milk"]);
    }

    #[tokio::test]
    async fn test_search_text_uses_like_semantics() {
        let (repo, _dir) = setup().await;
        repo.insert(&new_task("20240101", "Call MOM", "")).await.unwrap();

        // ASCII case-insensitive
        assert_eq!(repo.search_text("mom").await.unwrap().len(), 1);
        // `_` matches any single character
        assert_eq!(repo.search_text("C_ll").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_date() {
        let (repo, _dir) = setup().await;
        repo.insert(&new_task("20240308", "a", "")).await.unwrap();
        repo.insert(&new_task("20240309", "b", "")).await.unwrap();
        repo.insert(&new_task("20240308", "c", "")).await.unwrap();

        let found = repo.search_by_date("20240308").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| t.date == "20240308"));
    }

    #[tokio::test]
    async fn test_update_and_not_found() {
        let (repo, _dir) = setup().await;
        let id = repo.insert(&new_task("20240101", "old", "")).await.unwrap();

        let mut task = repo.find_by_id(id).await.unwrap().unwrap();
        task.title = "new".to_string();
        task.repeat = "y".to_string();
        repo.update(&task).await.unwrap();
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap(), task);

        task.id = TaskId::new(id.value() + 100).unwrap();
        let result = repo.update(&task).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_and_not_found() {
        let (repo, _dir) = setup().await;
        let id = repo.insert(&new_task("20240101", "gone", "")).await.unwrap();

        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());

        let result = repo.delete(id).await;
        assert!(matches!(result, Err(CoreError::NotFound(missing)) if missing == id));
    }
}
