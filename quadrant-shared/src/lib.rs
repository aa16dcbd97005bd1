//! # Quadrant Shared Library
//!
//! Domain types, persistence, and authentication primitives used by the
//! Quadrant API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection-string normalization, pooling, and migrations
//! - `models`: Users, tasks, and the fixed category set
//! - `repository`: Storage interface with PostgreSQL and SQLite backends
//! - `auth`: Password hashing and signed session tokens
//! - `service`: Owner-scoped task operations and statistics

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the Quadrant shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
