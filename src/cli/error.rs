//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::{ApplicationError, CatalogError, DispatchError, RenderError};
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => exitcode::USAGE,
            CliError::Infra(InfraError::HttpClient(_)) => exitcode::SOFTWARE,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Domain(_) => exitcode::USAGE,
                ApplicationError::Dispatch(DispatchError::UnreadableBody { .. }) => {
                    exitcode::NOINPUT
                }
                ApplicationError::Dispatch(_) => exitcode::USAGE,
                ApplicationError::Catalog(CatalogError::Malformed { .. }) => exitcode::DATAERR,
                ApplicationError::Catalog(CatalogError::Unreachable { .. }) => {
                    exitcode::UNAVAILABLE
                }
                ApplicationError::Render(RenderError::InvalidEnvelope { .. }) => {
                    exitcode::DATAERR
                }
                ApplicationError::Transport { .. } => exitcode::UNAVAILABLE,
                ApplicationError::Credential(_) | ApplicationError::Config { .. } => {
                    exitcode::CONFIG
                }
            },
        }
    }
}
