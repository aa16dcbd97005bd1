/// Domain models for Quadrant
///
/// # Models
///
/// - `user`: Accounts and the post-login summary
/// - `task`: Matrix tasks, creation input, and partial updates
/// - `category`: The fixed category set and per-category counts
///
/// Models are plain data; SQL lives in [`crate::repository`].

pub mod category;
pub mod task;
pub mod user;
