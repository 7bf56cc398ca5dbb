//! pccctl: command line client for the management REST API of cloud cache clusters
//!
//! Architecture:
//! - `domain`: pure logic (tokenizing, catalog, envelope, table layout)
//! - `application`: services orchestrating the pipeline over I/O traits
//! - `infrastructure`: real I/O implementations and the service container
//! - `cli`: argument parsing, command execution and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
