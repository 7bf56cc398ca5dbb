//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::traits::TransportFailure;

/// Failures obtaining cluster credentials.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error(
        "you entered {target} which is not a deployed cloud cache instance\n\
         To deploy this as an instance, enter:\n\n\tcf create-service p-cloudcache <plan> {target}"
    )]
    InvalidInstance { target: String },

    #[error(
        "please create a service key for {target}\n\
         To create a key enter:\n\n\tcf create-service-key {target} <your_key_name>"
    )]
    NoServiceKey { target: String },

    #[error("the service key response for {target} is invalid: {reason}")]
    InvalidServiceKeyResponse { target: String, reason: String },

    #[error("service key for {target} has no user starting with '{prefix}'")]
    NoOperatorUser { target: String, prefix: String },

    #[error("cannot run '{command}'")]
    Runner {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures discovering the endpoint catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("unable to reach {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("invalid API description from {url}: {message}")]
    Malformed { url: String, message: String },
}

/// Failures turning a command into a request.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("no endpoint was found for command '{command}'")]
    UnknownCommand { command: String },

    #[error("command '{command}' requires parameter -{parameter}=<value>")]
    MissingParameter { command: String, parameter: String },

    #[error(
        "a JSON body is required for {method} command '{command}': \
         re-enter your command appended with -body=<json> or -d=@<json_file>"
    )]
    MissingBody { command: String, method: String },

    #[error("cannot read request body from {path}")]
    UnreadableBody {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures rendering a response.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid response: {reason}")]
    InvalidEnvelope { reason: String },
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Credential(#[from] CredentialError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportFailure,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
