/// Business operations over the repositories
///
/// - [`accounts`]: registration, credential checks, identity resolution
/// - [`tasks`]: owner-scoped task CRUD, completion, and statistics
///
/// Services take the caller's user id explicitly; there is no ambient
/// "current user".

pub mod accounts;
pub mod tasks;

use crate::{auth::password::PasswordError, repository::RepositoryError};

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or invalid input
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Registration with a username that is already taken
    #[error("Username already exists")]
    UsernameTaken,

    /// Task does not exist or belongs to another user
    #[error("Task not found")]
    NotFound,

    /// Password hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failure, not retried
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
