//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unparseable runtime version string: {0:?}")]
    InvalidVersion(String),

    #[error("invalid host profile: {message}")]
    InvalidProfile { message: String },
}
