/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: HS256-signed session tokens carried in a cookie
///
/// # Example
///
/// ```no_run
/// use chrono::Duration;
/// use quadrant_shared::auth::password::{hash_password, verify_password};
/// use quadrant_shared::auth::session::{issue_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = issue_token(&SessionClaims::new(1, Duration::days(7)), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session;
