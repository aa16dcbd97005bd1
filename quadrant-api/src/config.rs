/// Configuration management for the API server
///
/// Configuration is read once from the environment at startup and passed into
/// [`crate::app::AppState`]; nothing reads the environment after that.
///
/// # Environment Variables
///
/// - `POSTGRES_URL` / `DATABASE_URL`: Database connection string (first one set
///   wins; absent means the local SQLite file)
/// - `SECRET_KEY`: Session signing key, at least 32 characters (required)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `DATABASE_POOL_SIZE`: Base pool size (default: 10)
/// - `DATABASE_MAX_OVERFLOW`: Connections allowed above the base (default: 20)
/// - `DATABASE_STATEMENT_TIMEOUT_MS`: PostgreSQL statement timeout (default: 30000)
/// - `SESSION_TTL_HOURS`: Session lifetime (default: 168)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `STATIC_DIR`: Front-end assets directory (default: static)
/// - `PRODUCTION`: Enables HSTS and secure cookies (default: false)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use quadrant_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use quadrant_shared::db::{pool::DatabaseConfig, url::normalize_database_url};
use std::env;
use std::path::PathBuf;

/// Minimum accepted length of `SECRET_KEY`
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration (URL already normalized)
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Directory holding `index.html` and other assets
    pub static_dir: PathBuf,

    /// Production mode (HSTS, `Secure` cookies)
    pub production: bool,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key for signing session tokens
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// How long a login stays valid
    pub ttl_hours: i64,
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `SECRET_KEY` is missing or too short
    /// - The database URL cannot be normalized
    /// - A numeric variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let raw_url = env::var("POSTGRES_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok();
        let url = normalize_database_url(raw_url.as_deref())?;

        let secret = env::var("SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SECRET_KEY must be at least {} characters long", MIN_SECRET_LEN);
        }

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("API_PORT", 8080)?,
                cors_origins,
                static_dir: env::var("STATIC_DIR")
                    .unwrap_or_else(|_| "static".to_string())
                    .into(),
                production: parse_var("PRODUCTION", false)?,
            },
            database: DatabaseConfig {
                url,
                pool_size: parse_var("DATABASE_POOL_SIZE", 10)?,
                max_overflow: parse_var("DATABASE_MAX_OVERFLOW", 20)?,
                statement_timeout_ms: parse_var("DATABASE_STATEMENT_TIMEOUT_MS", 30_000)?,
                ..Default::default()
            },
            session: SessionConfig {
                secret,
                ttl_hours: parse_var("SESSION_TTL_HOURS", 168)?,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
