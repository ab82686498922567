//! Credentials from the environment.

use crate::error::{Error, Result};

/// Read a required credential from environment variable `name`.
///
/// Unset and blank values are both errors.
pub fn require(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::MissingCredential { name }),
    }
}
