/// Common test utilities for integration tests
///
/// Each [`TestContext`] owns a private, migrated in-memory SQLite database and
/// a fully layered router, so tests never share state.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use quadrant_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, SessionConfig},
};
use quadrant_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig, DbPool},
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: DbPool,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context over a fresh in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();

        let db = create_pool(config.database.clone()).await?;
        run_migrations(&db).await?;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(Self { db, app, config })
    }

    /// Sends a request, optionally with a JSON body and a session cookie
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    /// Sends a prepared request through the router
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Registers `username` and returns the `Cookie` header value after login
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let registered = self
            .send(
                Method::POST,
                "/register",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(registered.status, StatusCode::OK, "{:?}", registered.body);

        let login = self
            .send(
                Method::POST,
                "/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);

        session_cookie(&login.headers).expect("login sets a session cookie")
    }

    /// Creates a task through the API and returns its JSON
    pub async fn create_task(&self, cookie: &str, body: Value) -> Value {
        let response = self
            .send(Method::POST, "/api/tasks", Some(body), Some(cookie))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }
}

/// Turns a `Set-Cookie` response header into a `Cookie` request header value
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with("quadrant_session=") && pair.len() > "quadrant_session=".len())
        .map(str::to_string)
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../static"),
            production: false,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        },
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 1,
        },
    }
}
