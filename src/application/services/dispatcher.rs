//! Request dispatch service
//!
//! Resolves a parsed command against the catalog, shapes the HTTP request
//! and sends it.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, DispatchError};
use crate::domain::{
    ClusterCredentials, EndpointCatalog, EndpointDescriptor, ParamLocation, ParsedCommand,
};
use crate::infrastructure::traits::{FileSystem, HttpRequest, HttpTransport};

/// Everything but RFC 3986 unreserved characters is encoded in path values.
const PATH_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Service turning commands into HTTP requests.
pub struct RequestDispatcher {
    http: Arc<dyn HttpTransport>,
    fs: Arc<dyn FileSystem>,
    placeholder: Regex,
}

impl RequestDispatcher {
    /// Create a new dispatcher.
    pub fn new(http: Arc<dyn HttpTransport>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            http,
            fs,
            placeholder: Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is valid"),
        }
    }

    /// Send the request for `command` and return the raw response body.
    ///
    /// Exactly one request is sent. The body is returned for any HTTP status;
    /// the response envelope carries the error details.
    pub fn dispatch(
        &self,
        command: &ParsedCommand,
        catalog: &EndpointCatalog,
        credentials: &ClusterCredentials,
    ) -> ApplicationResult<String> {
        let request = self.build_request(command, catalog, credentials)?;
        info!("dispatch: {} {}", request.method, request.url);

        let response = self
            .http
            .send(&request)
            .map_err(|source| ApplicationError::Transport {
                url: request.url.clone(),
                source,
            })?;
        if !response.is_success() {
            warn!("dispatch: {} answered HTTP {}", request.url, response.status);
        }
        Ok(response.body)
    }

    /// Build the HTTP request for `command` without sending it.
    ///
    /// # Errors
    /// - `UnknownCommand` if no catalog entry matches the command phrase
    /// - `MissingParameter` for unfilled path placeholders and required query or header parameters
    /// - `MissingBody` / `UnreadableBody` for mutating verbs without a usable body
    pub fn build_request(
        &self,
        command: &ParsedCommand,
        catalog: &EndpointCatalog,
        credentials: &ClusterCredentials,
    ) -> ApplicationResult<HttpRequest> {
        let endpoint =
            catalog
                .resolve(&command.command)
                .ok_or_else(|| DispatchError::UnknownCommand {
                    command: command.command.clone(),
                })?;
        debug!(
            "build_request: '{}' → {} {}",
            command.command, endpoint.http_method, endpoint.url
        );

        let path = self.resolve_path(endpoint, command)?;
        let query = self.query_parameters(endpoint, command)?;
        let headers = header_parameters(endpoint, command)?;
        let body = self.body(endpoint, command)?;

        Ok(HttpRequest {
            method: endpoint.http_method,
            url: credentials.url_for(&path),
            query,
            headers,
            body,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        })
    }

    /// Substitute `{name}` placeholders with percent-encoded flag values.
    fn resolve_path(
        &self,
        endpoint: &EndpointDescriptor,
        command: &ParsedCommand,
    ) -> ApplicationResult<String> {
        for caps in self.placeholder.captures_iter(&endpoint.url) {
            if !command.has_flag(&caps[1]) {
                return Err(missing_parameter(endpoint, &caps[1]));
            }
        }
        let path = self
            .placeholder
            .replace_all(&endpoint.url, |caps: &Captures| {
                let value = command.flag(&caps[1]).unwrap_or_default();
                utf8_percent_encode(value, PATH_VALUE).to_string()
            })
            .into_owned();
        Ok(path)
    }

    /// Declared query parameters plus forwarded undeclared flags.
    fn query_parameters(
        &self,
        endpoint: &EndpointDescriptor,
        command: &ParsedCommand,
    ) -> ApplicationResult<Vec<(String, String)>> {
        let mut query = Vec::new();
        let mut declared: HashSet<&str> = self
            .placeholder
            .captures_iter(&endpoint.url)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();

        for spec in &endpoint.parameters {
            declared.insert(spec.name.as_str());
            if spec.location != ParamLocation::Query {
                continue;
            }
            match command.flag(&spec.name) {
                Some(value) => query.push((spec.name.clone(), value.to_string())),
                None if spec.required => return Err(missing_parameter(endpoint, &spec.name)),
                None => {}
            }
        }

        for (name, value) in command.forwarded_flags() {
            if !declared.contains(name) {
                debug!("query_parameters: forwarding undeclared flag {}", name);
                query.push((name.to_string(), value.to_string()));
            }
        }
        Ok(query)
    }

    /// Request body for mutating verbs or endpoints declaring a body parameter.
    fn body(
        &self,
        endpoint: &EndpointDescriptor,
        command: &ParsedCommand,
    ) -> ApplicationResult<Option<String>> {
        let body_params: Vec<_> = endpoint
            .parameters
            .iter()
            .filter(|p| p.location == ParamLocation::Body)
            .collect();
        let required =
            endpoint.http_method.is_mutating() || body_params.iter().any(|p| p.required);
        let accepted = required || !body_params.is_empty();

        match command.body().filter(|value| !value.is_empty()) {
            Some(value) if accepted => self.load_body(value).map(Some),
            None if required => Err(DispatchError::MissingBody {
                command: endpoint.command_name.clone(),
                method: endpoint.http_method.to_string(),
            }
            .into()),
            _ => Ok(None),
        }
    }

    /// `@path` reads the body from a file; anything else is the body itself.
    fn load_body(&self, value: &str) -> ApplicationResult<String> {
        match value.strip_prefix('@') {
            Some(path) if !path.is_empty() => {
                let path = PathBuf::from(path);
                debug!("load_body: reading {}", path.display());
                self.fs
                    .read_to_string(&path)
                    .map_err(|source| DispatchError::UnreadableBody { path, source }.into())
            }
            _ => Ok(value.to_string()),
        }
    }
}

/// Declared header parameters supplied as flags.
fn header_parameters(
    endpoint: &EndpointDescriptor,
    command: &ParsedCommand,
) -> ApplicationResult<Vec<(String, String)>> {
    let mut headers = Vec::new();
    for spec in endpoint
        .parameters
        .iter()
        .filter(|p| p.location == ParamLocation::Header)
    {
        match command.flag(&spec.name) {
            Some(value) => headers.push((spec.name.clone(), value.to_string())),
            None if spec.required => return Err(missing_parameter(endpoint, &spec.name)),
            None => {}
        }
    }
    Ok(headers)
}

fn missing_parameter(endpoint: &EndpointDescriptor, name: &str) -> ApplicationError {
    DispatchError::MissingParameter {
        command: endpoint.command_name.clone(),
        parameter: name.to_string(),
    }
    .into()
}
