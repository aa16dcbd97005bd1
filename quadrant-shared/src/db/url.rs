/// Database connection-string normalization
///
/// The deployment environment hands us one of several connection-string shapes.
/// [`normalize_database_url`] turns every accepted shape into a DSN that the
/// pool layer can connect with:
///
/// | Input | Output |
/// |---|---|
/// | absent / blank | `sqlite://tasks.db?mode=rwc` (embedded file, no SSL) |
/// | `postgres://...` | `postgresql://...` with `sslmode=require` |
/// | `postgresql://...` | unchanged apart from `sslmode=require` |
/// | `prisma://host/?api_key=..` | direct `postgresql://` DSN on port 6543 with `sslmode=require` |
/// | `prisma+postgres://host/?api_key=..` | same as `prisma://` |
/// | anything else | unchanged |
///
/// The function is pure. Call it once while building the process configuration
/// and keep the result.
///
/// # Example
///
/// ```
/// use quadrant_shared::db::url::normalize_database_url;
///
/// let dsn = normalize_database_url(Some("postgres://u:p@h:5432/d")).unwrap();
/// assert_eq!(dsn, "postgresql://u:p@h:5432/d?sslmode=require");
/// ```

use url::Url;

/// Fallback used when no connection string is configured
pub const SQLITE_FALLBACK_URL: &str = "sqlite://tasks.db?mode=rwc";

/// Port of the direct PostgreSQL endpoint behind an Accelerate host
pub const ACCELERATE_DIRECT_PORT: u16 = 6543;

/// Database user when an Accelerate URL carries no `tenant_id`
const ACCELERATE_DEFAULT_USER: &str = "postgres";

/// Database name when an Accelerate URL carries no path
const ACCELERATE_DEFAULT_DATABASE: &str = "postgres";

/// Errors raised while normalizing a connection string
///
/// All of these are fatal configuration errors: the process must not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseUrlError {
    /// Accelerate URL without the mandatory `api_key` parameter
    #[error("Accelerate database URL is missing the api_key query parameter")]
    MissingApiKey,

    /// Accelerate URL without a host
    #[error("Accelerate database URL has no host")]
    MissingHost,

    /// The URL could not be parsed at all
    #[error("Malformed database URL: {0}")]
    Malformed(String),

    /// Scheme that no compiled-in driver understands
    #[error("Unsupported database scheme: {0}")]
    UnsupportedScheme(String),
}

/// Storage engine selected by a normalized URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Network PostgreSQL
    Postgres,

    /// Embedded SQLite file (or in-memory database)
    Sqlite,
}

impl Backend {
    /// Detects the backend from a normalized connection string
    pub fn from_url(url: &str) -> Result<Self, DatabaseUrlError> {
        match scheme_of(url) {
            "postgresql" | "postgres" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(DatabaseUrlError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Backend name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }
}

/// Normalizes a raw connection string into a driver-ready DSN
///
/// # Errors
///
/// - [`DatabaseUrlError::MissingApiKey`] for an Accelerate URL without `api_key`
/// - [`DatabaseUrlError::MissingHost`] / [`DatabaseUrlError::Malformed`] when an
///   Accelerate URL cannot be taken apart
pub fn normalize_database_url(raw: Option<&str>) -> Result<String, DatabaseUrlError> {
    let raw = match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => raw,
        None => return Ok(SQLITE_FALLBACK_URL.to_string()),
    };

    if raw.starts_with("prisma://") || raw.starts_with("prisma+postgres://") {
        return rewrite_accelerate_url(raw);
    }

    if let Some(rest) = raw.strip_prefix("postgres://") {
        return Ok(require_ssl(&format!("postgresql://{}", rest)));
    }

    if raw.starts_with("postgresql://") {
        return Ok(require_ssl(raw));
    }

    Ok(raw.to_string())
}

/// Strips credentials so a DSN can be logged
pub fn redact_credentials(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.has_host() => {
            let _ = parsed.set_password(None);
            let _ = parsed.set_username("");
            parsed.to_string()
        }
        Ok(_) => url.to_string(),
        Err(_) => "<unparseable>".to_string(),
    }
}

/// SSL modes that already require an encrypted connection
const REQUIRED_SSL_MODES: [&str; 3] = ["require", "verify-ca", "verify-full"];

/// Picks the sslmode to send: a requiring mode is kept, anything else becomes `require`
fn effective_ssl_mode(supplied: Option<&str>) -> &str {
    match supplied {
        Some(mode) if REQUIRED_SSL_MODES.contains(&mode) => mode,
        _ => "require",
    }
}

/// Ensures the DSN requires SSL
///
/// `verify-ca` and `verify-full` survive untouched; `disable`, `allow`,
/// `prefer` or a missing sslmode become `require`. Other query parameters
/// keep their original order and encoding.
fn require_ssl(url: &str) -> String {
    let (base, query) = url.split_once('?').unwrap_or((url, ""));

    let mut supplied = None;
    let mut params: Vec<&str> = Vec::new();
    for param in query.split('&').filter(|param| !param.is_empty()) {
        match param.strip_prefix("sslmode=") {
            Some(mode) => supplied = Some(mode),
            None => params.push(param),
        }
    }

    let sslmode = format!("sslmode={}", effective_ssl_mode(supplied));
    params.push(&sslmode);

    format!("{}?{}", base, params.join("&"))
}

/// Rebuilds an Accelerate URL as a direct PostgreSQL DSN
///
/// `api_key` becomes the password and `tenant_id`, when present, the user.
fn rewrite_accelerate_url(raw: &str) -> Result<String, DatabaseUrlError> {
    let parsed = Url::parse(raw).map_err(|e| DatabaseUrlError::Malformed(e.to_string()))?;

    let host = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or(DatabaseUrlError::MissingHost)?;

    let mut api_key = None;
    let mut tenant_id = None;
    let mut sslmode = None;
    let mut passthrough = Vec::new();

    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "api_key" => api_key = Some(value.into_owned()),
            "tenant_id" => tenant_id = Some(value.into_owned()),
            "sslmode" => sslmode = Some(value.into_owned()),
            _ => passthrough.push((key.into_owned(), value.into_owned())),
        }
    }

    let api_key = api_key
        .filter(|key| !key.is_empty())
        .ok_or(DatabaseUrlError::MissingApiKey)?;

    let database = match parsed.path().trim_matches('/') {
        "" => ACCELERATE_DEFAULT_DATABASE,
        path => path,
    };

    let mut direct = Url::parse(&format!("postgresql://{}", host))
        .map_err(|e| DatabaseUrlError::Malformed(e.to_string()))?;

    let invalid = |_| DatabaseUrlError::Malformed("cannot carry credentials".to_string());
    direct
        .set_port(Some(ACCELERATE_DIRECT_PORT))
        .map_err(invalid)?;
    direct
        .set_username(
            tenant_id
                .as_deref()
                .filter(|tenant| !tenant.is_empty())
                .unwrap_or(ACCELERATE_DEFAULT_USER),
        )
        .map_err(invalid)?;
    direct.set_password(Some(&api_key)).map_err(invalid)?;
    direct.set_path(&format!("/{}", database));

    {
        let mut query = direct.query_pairs_mut();
        for (key, value) in &passthrough {
            query.append_pair(key, value);
        }
        query.append_pair("sslmode", effective_ssl_mode(sslmode.as_deref()));
    }

    Ok(direct.to_string())
}

fn scheme_of(url: &str) -> &str {
    url.split(':').next().unwrap_or_default()
}
