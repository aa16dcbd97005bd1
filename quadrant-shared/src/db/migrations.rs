/// Schema migrations
///
/// Migrations live in `migrations/postgres/` and `migrations/sqlite/` at the
/// workspace root and are embedded at compile time with `sqlx::migrate!`.
/// Running them is idempotent: sqlx records applied versions in
/// `_sqlx_migrations`, so calling [`run_migrations`] on every boot is safe.
///
/// # Example
///
/// ```no_run
/// use quadrant_shared::db::pool::{create_pool, DatabaseConfig};
/// use quadrant_shared::db::migrations::{run_migrations, get_migration_status};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: "sqlite://tasks.db?mode=rwc".to_string(),
///         ..Default::default()
///     })
///     .await?;
///
///     run_migrations(&pool).await?;
///
///     let status = get_migration_status(&pool).await?;
///     println!("Applied {} migrations", status.applied_migrations);
///     Ok(())
/// }
/// ```

use super::pool::DbPool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::{debug, info, warn};

static POSTGRES_MIGRATIONS: Migrator = sqlx::migrate!("../migrations/postgres");
static SQLITE_MIGRATIONS: Migrator = sqlx::migrate!("../migrations/sqlite");

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp)
    pub latest_version: Option<i64>,

    /// Whether every embedded migration has been applied
    pub is_up_to_date: bool,
}

/// Runs all pending migrations for the pool's backend
///
/// # Errors
///
/// Returns an error if a migration fails to execute or an applied migration
/// no longer matches its embedded checksum.
pub async fn run_migrations(pool: &DbPool) -> Result<(), MigrateError> {
    info!(backend = pool.backend().as_str(), "Starting database migrations");

    let result = match pool {
        DbPool::Postgres(pool) => POSTGRES_MIGRATIONS.run(pool).await,
        DbPool::Sqlite(pool) => SQLITE_MIGRATIONS.run(pool).await,
    };

    match result {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Gets the current migration status
///
/// # Errors
///
/// Returns an error if the migrations table exists but cannot be queried.
pub async fn get_migration_status(pool: &DbPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    const STATUS_QUERY: &str = "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true";

    let (table_exists, embedded) = match pool {
        DbPool::Postgres(pool) => {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = current_schema()
                    AND table_name = '_sqlx_migrations'
                )",
            )
            .fetch_one(pool)
            .await?;
            (exists, POSTGRES_MIGRATIONS.iter().count())
        }
        DbPool::Sqlite(pool) => {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (
                    SELECT 1 FROM sqlite_master
                    WHERE type = 'table' AND name = '_sqlx_migrations'
                )",
            )
            .fetch_one(pool)
            .await?;
            (exists, SQLITE_MIGRATIONS.iter().count())
        }
    };

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
            is_up_to_date: embedded == 0,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = match pool {
        DbPool::Postgres(pool) => sqlx::query_as(STATUS_QUERY).fetch_one(pool).await?,
        DbPool::Sqlite(pool) => sqlx::query_as(STATUS_QUERY).fetch_one(pool).await?,
    };

    debug!(
        applied_migrations = count,
        latest_version = ?latest_version,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
        is_up_to_date: count as usize >= embedded,
    })
}
