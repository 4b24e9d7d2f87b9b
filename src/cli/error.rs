//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Every fatal condition exits 1; the certificate step never produces
    /// a CliError in the first place.
    pub fn exit_code(&self) -> i32 {
        crate::exitcode::FAILURE
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
