//! Endpoint catalog: command names mapped to REST endpoints
//!
//! Built from the self-describing API document served by the management API.
//! The document maps URL path → HTTP method → `{commandName, parameters}`; a
//! Swagger-style wrapper with a top-level `paths` object is accepted as well.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// HTTP verbs an endpoint can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Verbs that must carry a request body.
    pub fn is_mutating(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(format!("unknown HTTP method: {other}")),
        }
    }
}

/// Where a parameter goes in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    #[default]
    Query,
    Body,
    Header,
    #[serde(other)]
    Other,
}

/// A declared endpoint parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: ParamLocation,
    #[serde(default)]
    pub required: bool,
}

/// One REST endpoint reachable by command name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub command_name: String,
    /// Path template relative to the base URL, e.g. `/regions/{id}`
    pub url: String,
    pub http_method: HttpMethod,
    pub parameters: Vec<ParamSpec>,
}

/// Operation entry as found in the API document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOperation {
    command_name: Option<String>,
    #[serde(default)]
    parameters: Option<Vec<ParamSpec>>,
}

/// API document could not be read as a catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CatalogParseError {
    pub message: String,
}

impl CatalogParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Normalize a command phrase: lower-case words joined by `-`.
///
/// `List Regions`, `list-regions` and `list  regions` all map to `list-regions`.
pub fn canonical_command_name(phrase: &str) -> String {
    phrase
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .join("-")
}

/// Command name → endpoint mapping for one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointCatalog {
    endpoints: BTreeMap<String, EndpointDescriptor>,
}

impl EndpointCatalog {
    /// Flatten an API document into a catalog.
    ///
    /// Every (path, method) pair is visited once in document order; an entry
    /// sharing the command name of an earlier one replaces it.
    pub fn from_document(text: &str) -> Result<Self, CatalogParseError> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| CatalogParseError::new(format!("not a JSON document: {e}")))?;

        let paths = match document.get("paths") {
            Some(Value::Object(paths)) => paths,
            _ => document
                .as_object()
                .ok_or_else(|| CatalogParseError::new("expected a mapping of paths"))?,
        };

        let mut catalog = EndpointCatalog::default();
        for (path, operations) in paths {
            let operations = operations.as_object().ok_or_else(|| {
                CatalogParseError::new(format!("path {path}: expected a mapping of methods"))
            })?;

            for (method, operation) in operations {
                let http_method = match method.parse::<HttpMethod>() {
                    Ok(m) => m,
                    Err(_) => {
                        debug!("from_document: skipping non-method key {path} {method}");
                        continue;
                    }
                };
                let raw: RawOperation = serde_json::from_value(operation.clone()).map_err(|e| {
                    CatalogParseError::new(format!("{method} {path}: {e}"))
                })?;
                let Some(command_name) = raw.command_name else {
                    warn!("from_document: no commandName for {method} {path}, skipped");
                    continue;
                };

                catalog.insert(EndpointDescriptor {
                    command_name,
                    url: path.clone(),
                    http_method,
                    parameters: raw.parameters.unwrap_or_default(),
                });
            }
        }
        debug!("from_document: {} commands", catalog.len());
        Ok(catalog)
    }

    /// Add an endpoint, replacing any endpoint with the same command name.
    pub fn insert(&mut self, endpoint: EndpointDescriptor) {
        if let Some(previous) = self
            .endpoints
            .insert(endpoint.command_name.clone(), endpoint)
        {
            debug!(
                "insert: {} previously at {} {} replaced",
                previous.command_name, previous.http_method, previous.url
            );
        }
    }

    /// Find the endpoint for a command phrase.
    ///
    /// Exact command names win; otherwise phrases are compared in canonical form.
    pub fn resolve(&self, phrase: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.get(phrase).or_else(|| {
            let wanted = canonical_command_name(phrase);
            self.endpoints
                .values()
                .find(|e| canonical_command_name(&e.command_name) == wanted)
        })
    }

    /// All endpoints, sorted by command name.
    pub fn commands(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.endpoints.values()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
