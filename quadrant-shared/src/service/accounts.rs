/// Account registration and credential checks
///
/// # State Machine
///
/// ```text
/// Anonymous --authenticate--> Authenticated{user_id} --logout/expiry--> Anonymous
/// ```
///
/// This service only decides *who* a caller is. Carrying that decision across
/// requests (the session cookie) is the HTTP layer's job.

use super::{ServiceError, ServiceResult};
use crate::{
    auth::password::{self, PasswordError},
    models::user::{NewUser, User},
    repository::{RepositoryError, UserRepository},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Registration and login over a [`UserRepository`]
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Creates an account; does not log the new user in
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] for an empty username or password
    /// - [`ServiceError::UsernameTaken`] if the exact username exists
    pub async fn register(&self, username: &str, password: &str) -> ServiceResult<User> {
        if username.is_empty() {
            return Err(ServiceError::Validation("Username is required".to_string()));
        }
        if password.is_empty() {
            return Err(ServiceError::Validation("Password is required".to_string()));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(ServiceError::UsernameTaken);
        }

        let password_hash = hash_off_runtime(password.to_string()).await?;

        let user = self
            .users
            .create(
                NewUser {
                    username: username.to_string(),
                    password_hash,
                },
                Utc::now(),
            )
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                RepositoryError::Conflict(_) => ServiceError::UsernameTaken,
                other => ServiceError::Storage(other),
            })?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Checks credentials and returns the matching user
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(username = %username, "Failed login attempt");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_off_runtime(password.to_string(), user.password_hash.clone()).await? {
            warn!(username = %username, "Failed login attempt");
            return Err(ServiceError::InvalidCredentials);
        }

        info!(user_id = user.id, username = %user.username, "User logged in");
        Ok(user)
    }

    /// Looks up the user behind a session; `None` if the account is gone
    pub async fn resolve(&self, user_id: i64) -> ServiceResult<Option<User>> {
        Ok(self.users.find_by_id(user_id).await?)
    }
}

// Argon2id runs on the blocking pool, off the async workers
async fn hash_off_runtime(password: String) -> ServiceResult<String> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashError(e.to_string()))??;
    Ok(hash)
}

async fn verify_off_runtime(password: String, hash: String) -> ServiceResult<bool> {
    let matches = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(e.to_string()))??;
    Ok(matches)
}
