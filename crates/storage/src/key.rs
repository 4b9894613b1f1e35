//! Key validation.
//!
//! Keys are flat names. Every backend maps them directly onto its medium (a
//! file name, a table row), so anything that could be interpreted as a path
//! is rejected outright instead of normalized.

use crate::error::{ErrorKind, Result};

/// Validates a storage key.
///
/// Only ASCII alphanumerics, `_`, `-` and `.` are allowed, and the key must
/// not be empty or consist solely of dots.
///
/// # Examples
///
/// ```
/// use shelf_storage::validate_key;
/// assert!(validate_key("library_authors").is_ok());
/// assert!(validate_key("books.v2").is_ok());
/// assert!(validate_key("../etc/passwd").is_err());
/// assert!(validate_key("a/b").is_err());
/// assert!(validate_key("").is_err());
/// ```
pub fn validate(key: &str) -> Result<&str> {
    if key.is_empty() || key.chars().all(|c| c == '.') {
        exn::bail!(ErrorKind::InvalidKey(key.to_string()));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        exn::bail!(ErrorKind::InvalidKey(key.to_string()));
    }
    Ok(key)
}
