//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod command;
pub mod entities;
pub mod envelope;
pub mod error;
pub mod table;

pub use catalog::{
    canonical_command_name, CatalogParseError, EndpointCatalog, EndpointDescriptor, HttpMethod,
    ParamLocation, ParamSpec,
};
pub use command::{parse_command, tokenize, Invocation, ParsedCommand};
pub use entities::ClusterCredentials;
pub use envelope::{MemberStatus, Record, ResponseEnvelope};
pub use error::DomainError;
pub use table::{pad, render_table, CommandKind};
