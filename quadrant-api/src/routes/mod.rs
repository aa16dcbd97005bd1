/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Login, registration, logout
/// - `tasks`: Task CRUD and completion
/// - `user`: Per-user statistics

pub mod auth;
pub mod health;
pub mod tasks;
pub mod user;
