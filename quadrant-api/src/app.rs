/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use quadrant_api::{app::{build_router, AppState}, config::Config};
/// use quadrant_shared::db::{migrations::run_migrations, pool::create_pool};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// run_migrations(&pool).await?;
///
/// let app = build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, session::require_session};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use quadrant_shared::{
    db::pool::DbPool,
    repository::Repositories,
    service::{accounts::AccountService, tasks::TaskService},
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Registration and login
    pub accounts: AccountService,

    /// Owner-scoped task operations
    pub tasks: TaskService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services to the repositories for `db`
    pub fn new(db: DbPool, config: Config) -> Self {
        let repos = Repositories::for_pool(&db);

        Self {
            accounts: AccountService::new(repos.users),
            tasks: TaskService::new(repos.tasks),
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                         # index.html (public)
/// ├── /static/*                      # assets (public)
/// ├── GET  /health                   # health check (public)
/// ├── POST /login, /api/login        # public
/// ├── POST /register, /api/register  # public
/// ├── GET  /logout                   # public, always redirects
/// └── /api/                          # session required
///     ├── GET, POST   /tasks
///     ├── PUT, DELETE /tasks/:id
///     ├── POST        /tasks/:id/complete
///     ├── GET         /user/stats
///     ├── GET         /user/tasks
///     └── GET         /user/category-stats
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session check (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/register", post(routes::auth::register));

    let protected_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/complete", post(routes::tasks::complete_task))
        .route("/user/stats", get(routes::user::stats))
        .route("/user/tasks", get(routes::user::tasks_view))
        .route("/user/category-stats", get(routes::user::category_stats))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let static_dir = &state.config.api.static_dir;
    let pages = Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir));

    Router::new()
        .merge(pages)
        .route("/health", get(routes::health::health_check))
        .route("/logout", get(routes::auth::logout))
        .merge(auth_routes.clone())
        .nest("/api", auth_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
