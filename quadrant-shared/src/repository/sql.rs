/// SQL-backed repositories
///
/// `PgStore` and `SqliteStore` are generated from one definition. The
/// statements stick to the subset both engines accept: `$N` placeholders,
/// `RETURNING`, `TRUE`/`FALSE` literals.

use super::{RepositoryResult, TaskRepository, UserRepository};
use crate::models::{
    task::{NewTask, Task, TaskChanges, TaskOrder},
    user::{NewUser, User},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

const USER_INSERT: &str = r#"
    INSERT INTO users (username, password_hash, created_at)
    VALUES ($1, $2, $3)
    RETURNING id, username, password_hash, created_at
"#;

const USER_BY_USERNAME: &str = r#"
    SELECT id, username, password_hash, created_at
    FROM users
    WHERE username = $1
"#;

const USER_BY_ID: &str = r#"
    SELECT id, username, password_hash, created_at
    FROM users
    WHERE id = $1
"#;

const USER_DELETE: &str = "DELETE FROM users WHERE id = $1";

const TASK_INSERT: &str = r#"
    INSERT INTO tasks (user_id, title, description, category, importance, urgency,
                       completed, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $7)
    RETURNING id, user_id, title, description, category, importance, urgency,
              completed, created_at, updated_at, completed_at
"#;

const TASK_BY_ID: &str = r#"
    SELECT id, user_id, title, description, category, importance, urgency,
           completed, created_at, updated_at, completed_at
    FROM tasks
    WHERE id = $1 AND user_id = $2
"#;

const TASKS_BY_OWNER: &str = r#"
    SELECT id, user_id, title, description, category, importance, urgency,
           completed, created_at, updated_at, completed_at
    FROM tasks
    WHERE user_id = $1
    ORDER BY id
"#;

const TASKS_BY_OWNER_NEWEST: &str = r#"
    SELECT id, user_id, title, description, category, importance, urgency,
           completed, created_at, updated_at, completed_at
    FROM tasks
    WHERE user_id = $1
    ORDER BY created_at DESC, id DESC
"#;

const TASK_UPDATE: &str = r#"
    UPDATE tasks
    SET title = $3, description = $4, category = $5, importance = $6, urgency = $7,
        updated_at = $8
    WHERE id = $1 AND user_id = $2
    RETURNING id, user_id, title, description, category, importance, urgency,
              completed, created_at, updated_at, completed_at
"#;

const TASK_COMPLETE: &str = r#"
    UPDATE tasks
    SET completed = TRUE, completed_at = $3, updated_at = $3
    WHERE id = $1 AND user_id = $2
"#;

const TASK_DELETE: &str = "DELETE FROM tasks WHERE id = $1 AND user_id = $2";

macro_rules! sql_store {
    ($(#[$meta:meta])* $store:ident, $pool:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $store {
            pool: $pool,
        }

        impl $store {
            /// Wraps an existing pool
            pub fn new(pool: $pool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl UserRepository for $store {
            async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepositoryResult<User> {
                let user = sqlx::query_as::<_, User>(USER_INSERT)
                    .bind(user.username)
                    .bind(user.password_hash)
                    .bind(now)
                    .fetch_one(&self.pool)
                    .await?;

                Ok(user)
            }

            async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
                let user = sqlx::query_as::<_, User>(USER_BY_USERNAME)
                    .bind(username)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(user)
            }

            async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
                let user = sqlx::query_as::<_, User>(USER_BY_ID)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(user)
            }

            async fn delete(&self, id: i64) -> RepositoryResult<bool> {
                let result = sqlx::query(USER_DELETE)
                    .bind(id)
                    .execute(&self.pool)
                    .await?;

                Ok(result.rows_affected() > 0)
            }
        }

        #[async_trait]
        impl TaskRepository for $store {
            async fn insert(
                &self,
                owner: i64,
                task: NewTask,
                now: DateTime<Utc>,
            ) -> RepositoryResult<Task> {
                let task = sqlx::query_as::<_, Task>(TASK_INSERT)
                    .bind(owner)
                    .bind(task.title)
                    .bind(task.description)
                    .bind(task.category)
                    .bind(task.importance)
                    .bind(task.urgency)
                    .bind(now)
                    .fetch_one(&self.pool)
                    .await?;

                Ok(task)
            }

            async fn find_by_id(&self, owner: i64, id: i64) -> RepositoryResult<Option<Task>> {
                let task = sqlx::query_as::<_, Task>(TASK_BY_ID)
                    .bind(id)
                    .bind(owner)
                    .fetch_optional(&self.pool)
                    .await?;

                Ok(task)
            }

            async fn list_by_owner(
                &self,
                owner: i64,
                order: TaskOrder,
            ) -> RepositoryResult<Vec<Task>> {
                let sql = match order {
                    TaskOrder::Unspecified => TASKS_BY_OWNER,
                    TaskOrder::NewestFirst => TASKS_BY_OWNER_NEWEST,
                };

                let tasks = sqlx::query_as::<_, Task>(sql)
                    .bind(owner)
                    .fetch_all(&self.pool)
                    .await?;

                Ok(tasks)
            }

            async fn update(
                &self,
                owner: i64,
                id: i64,
                changes: &TaskChanges,
                now: DateTime<Utc>,
            ) -> RepositoryResult<Option<Task>> {
                // Dropping the transaction without commit rolls it back
                let mut tx = self.pool.begin().await?;

                let existing = sqlx::query_as::<_, Task>(TASK_BY_ID)
                    .bind(id)
                    .bind(owner)
                    .fetch_optional(&mut *tx)
                    .await?;

                let Some(mut task) = existing else {
                    debug!(task_id = id, user_id = owner, "Update target not found");
                    return Ok(None);
                };

                changes.apply(&mut task, now);

                let updated = sqlx::query_as::<_, Task>(TASK_UPDATE)
                    .bind(id)
                    .bind(owner)
                    .bind(task.title)
                    .bind(task.description)
                    .bind(task.category)
                    .bind(task.importance)
                    .bind(task.urgency)
                    .bind(task.updated_at)
                    .fetch_one(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok(Some(updated))
            }

            async fn mark_completed(
                &self,
                owner: i64,
                id: i64,
                now: DateTime<Utc>,
            ) -> RepositoryResult<bool> {
                let result = sqlx::query(TASK_COMPLETE)
                    .bind(id)
                    .bind(owner)
                    .bind(now)
                    .execute(&self.pool)
                    .await?;

                Ok(result.rows_affected() > 0)
            }

            async fn delete(&self, owner: i64, id: i64) -> RepositoryResult<bool> {
                let result = sqlx::query(TASK_DELETE)
                    .bind(id)
                    .bind(owner)
                    .execute(&self.pool)
                    .await?;

                Ok(result.rows_affected() > 0)
            }
        }
    };
}

sql_store!(
    /// PostgreSQL-backed store
    PgStore,
    sqlx::PgPool
);

sql_store!(
    /// SQLite-backed store, used for the embedded fallback and in tests
    SqliteStore,
    sqlx::SqlitePool
);
