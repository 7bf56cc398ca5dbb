//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, HttpTransport)
//! but are themselves concrete structs, not traits.

mod catalog;
mod credentials;
mod dispatcher;
mod renderer;

pub use catalog::{CatalogService, API_DOCS_PATH};
pub use credentials::{
    apply_login_flags, parse_service_key, parse_service_key_name, CfCredentialProvider,
    CredentialProvider, ServiceKey, ServiceKeyUrls, ServiceKeyUser, StaticCredentialProvider,
};
pub use dispatcher::RequestDispatcher;
pub use renderer::{OutputFormat, ResponseRenderer};
