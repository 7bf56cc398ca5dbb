//! Response rendering service

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationResult, RenderError};
use crate::domain::{render_table, CommandKind, ResponseEnvelope};

/// Output format of a rendered response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Service turning raw response bodies into printable text.
#[derive(Debug, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw body into an envelope.
    ///
    /// The body must be a JSON object whose fields match the envelope shape.
    pub fn parse(&self, raw: &str) -> ApplicationResult<ResponseEnvelope> {
        let value: Value = serde_json::from_str(raw).map_err(|e| RenderError::InvalidEnvelope {
            reason: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(RenderError::InvalidEnvelope {
                reason: "top-level value is not a JSON object".into(),
            }
            .into());
        }
        let envelope = serde_json::from_value(value).map_err(|e| RenderError::InvalidEnvelope {
            reason: e.to_string(),
        })?;
        Ok(envelope)
    }

    /// Parse, optionally filter by groups, and render `raw` in `format`.
    pub fn render(
        &self,
        raw: &str,
        kind: &CommandKind,
        format: OutputFormat,
        groups: Option<&BTreeSet<String>>,
    ) -> ApplicationResult<String> {
        let mut envelope = self.parse(raw)?;
        if let Some(wanted) = groups {
            let before = envelope.result.len();
            envelope.retain_groups(wanted);
            debug!(
                "render: group filter kept {} of {} records",
                envelope.result.len(),
                before
            );
        }

        match format {
            OutputFormat::Json => self.to_json(&envelope),
            OutputFormat::Table => Ok(render_table(&envelope, kind)),
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self, envelope: &ResponseEnvelope) -> ApplicationResult<String> {
        serde_json::to_string_pretty(envelope).map_err(|e| {
            RenderError::InvalidEnvelope {
                reason: e.to_string(),
            }
            .into()
        })
    }
}
