//! Command execution: tokenize, authenticate, discover, dispatch, render

use std::fmt::Write as _;

use tracing::{debug, info, instrument};

use crate::application::services::{apply_login_flags, OutputFormat};
use crate::application::{ApplicationError, DispatchError};
use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::table::pad;
use crate::domain::{
    canonical_command_name, tokenize, CommandKind, EndpointCatalog, EndpointDescriptor,
    Invocation,
};
use crate::infrastructure::di::ServiceContainer;

/// Built-in command listing the catalog of a cluster.
pub const LIST_COMMANDS: &str = "commands";

const LISTING_WIDTH: usize = 30;

/// Execute the invocation described by the command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!("execute_command: settings loaded: {:?}", settings.default_target);

    if cli.show_config {
        output::header("Effective configuration");
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    let container = ServiceContainer::new(settings)?;
    let text = run(&container, &cli.args)?;
    output::info(&text);
    Ok(())
}

/// Run one invocation and return the text to print.
#[instrument(skip_all)]
pub fn run(container: &ServiceContainer, args: &[String]) -> CliResult<String> {
    let Invocation { target, command } =
        tokenize(args, container.settings.default_target.as_deref())
            .map_err(ApplicationError::from)?;
    info!("run: target={} command='{}'", target, command.command);

    let credentials = container.credential_provider().credentials(&target)?;
    let credentials =
        apply_login_flags(credentials, &command).map_err(ApplicationError::from)?;

    let catalog = container.catalog_service().discover(&credentials)?;

    if canonical_command_name(&command.command) == LIST_COMMANDS {
        if catalog.is_empty() {
            output::warning(&format!("no commands found for {target}"));
        }
        return Ok(list_commands(&catalog));
    }

    if command.wants_help() {
        let endpoint = catalog
            .resolve(&command.command)
            .ok_or_else(|| {
                ApplicationError::from(DispatchError::UnknownCommand {
                    command: command.command.clone(),
                })
            })?;
        return Ok(describe_command(endpoint));
    }

    let groups = match command.group_filter() {
        Some(groups) if groups.is_empty() => {
            return Err(CliError::InvalidArgs(
                "-g needs a comma separated list of groups".into(),
            ))
        }
        groups => groups,
    };

    let raw = container.dispatcher().dispatch(&command, &catalog, &credentials)?;

    let kind = CommandKind::from_command(&command.command);
    let format = if command.wants_json() || !kind.has_table_layout() {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    debug!("run: rendering {:?} as {}", kind, format);

    let text = container
        .renderer()
        .render(&raw, &kind, format, groups.as_ref())?;
    Ok(text)
}

/// One line per catalog entry: name, method and URL template.
pub fn list_commands(catalog: &EndpointCatalog) -> String {
    let mut out = String::new();
    for endpoint in catalog.commands() {
        let _ = writeln!(
            out,
            "{}{}{}",
            pad(&endpoint.command_name, LISTING_WIDTH, ' '),
            pad(endpoint.http_method.as_str(), 8, ' '),
            endpoint.url
        );
    }
    let _ = write!(out, "\nNumber of Commands: {}", catalog.len());
    out
}

/// Endpoint and parameters behind a command.
pub fn describe_command(endpoint: &EndpointDescriptor) -> String {
    let mut out = format!(
        "{}\n  {} {}\n",
        endpoint.command_name, endpoint.http_method, endpoint.url
    );
    if endpoint.parameters.is_empty() {
        return out;
    }
    out.push_str("\nParameters:\n");
    for param in &endpoint.parameters {
        let location = format!("{:?}", param.location).to_lowercase();
        let _ = writeln!(
            out,
            "  -{} ({}){}",
            param.name,
            location,
            if param.required { " required" } else { "" }
        );
    }
    out
}
