/// Storage interface
///
/// The service layer depends on [`UserRepository`] and [`TaskRepository`]
/// rather than on a concrete driver. Both backends share one SQL dialect
/// (`$N` placeholders, `RETURNING`) and are generated from the same source in
/// [`sql`].
///
/// Every task query is scoped by the owner's user id. A task that exists but
/// belongs to someone else is indistinguishable from a missing one.
///
/// # Example
///
/// ```no_run
/// use quadrant_shared::db::pool::{create_pool, DatabaseConfig};
/// use quadrant_shared::models::task::{NewTask, TaskOrder};
/// use quadrant_shared::repository::Repositories;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: "sqlite::memory:".to_string(),
///     ..Default::default()
/// })
/// .await?;
///
/// let repos = Repositories::for_pool(&pool);
/// let tasks = repos.tasks.list_by_owner(1, TaskOrder::NewestFirst).await?;
/// # Ok(())
/// # }
/// ```

pub mod sql;

use crate::{
    db::pool::DbPool,
    models::{
        task::{NewTask, Task, TaskChanges, TaskOrder},
        user::{NewUser, User},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use sql::{PgStore, SqliteStore};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// Any other driver or database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return RepositoryError::Conflict(constraint);
            }
        }
        RepositoryError::Database(err)
    }
}

/// Result alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// User storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; a taken username yields [`RepositoryError::Conflict`]
    async fn create(&self, user: NewUser, now: DateTime<Utc>) -> RepositoryResult<User>;

    /// Exact, case-sensitive username lookup
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    /// Deletes a user and, by cascade, all of its tasks
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

/// Owner-scoped task storage
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new, not yet completed task
    async fn insert(&self, owner: i64, task: NewTask, now: DateTime<Utc>) -> RepositoryResult<Task>;

    async fn find_by_id(&self, owner: i64, id: i64) -> RepositoryResult<Option<Task>>;

    async fn list_by_owner(&self, owner: i64, order: TaskOrder) -> RepositoryResult<Vec<Task>>;

    /// Applies a partial update in one transaction; `None` if not found/owned
    async fn update(
        &self,
        owner: i64,
        id: i64,
        changes: &TaskChanges,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<Task>>;

    /// Sets `completed` and stamps `completed_at`; `false` if not found/owned
    async fn mark_completed(&self, owner: i64, id: i64, now: DateTime<Utc>) -> RepositoryResult<bool>;

    /// `false` if not found/owned
    async fn delete(&self, owner: i64, id: i64) -> RepositoryResult<bool>;
}

/// Repository handles for one pool
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    /// Builds the store matching the pool's backend
    pub fn for_pool(pool: &DbPool) -> Self {
        match pool {
            DbPool::Postgres(pool) => {
                let store = PgStore::new(pool.clone());
                Self {
                    users: Arc::new(store.clone()),
                    tasks: Arc::new(store),
                }
            }
            DbPool::Sqlite(pool) => {
                let store = SqliteStore::new(pool.clone());
                Self {
                    users: Arc::new(store.clone()),
                    tasks: Arc::new(store),
                }
            }
        }
    }
}
