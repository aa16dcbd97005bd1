/// Database layer for Quadrant
///
/// # Modules
///
/// - `url`: Connection-string normalization (plain, Postgres, Accelerate, SQLite fallback)
/// - `pool`: Bounded connection pool for PostgreSQL or SQLite with health checks
/// - `migrations`: Idempotent schema migrations run on every boot
///
/// # Example
///
/// ```no_run
/// use quadrant_shared::db::{pool::{create_pool, DatabaseConfig}, url::normalize_database_url};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let raw = std::env::var("DATABASE_URL").ok();
///     let config = DatabaseConfig {
///         url: normalize_database_url(raw.as_deref())?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
pub mod url;
