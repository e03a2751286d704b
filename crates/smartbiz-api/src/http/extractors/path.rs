//! Path identifier parsing with envelope-formatted 400s.

use std::str::FromStr;

use crate::http::error::AppError;

/// Parse a UUID-backed identifier from a path segment.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|_| AppError::Validation(format!("Invalid {what} id: {raw}")))
}
