/// Middleware for the API server
///
/// - Security headers on every response
///
/// Session enforcement lives in [`crate::session`].

pub mod security;
