//! Cluster credential resolution
//!
//! Credentials come either straight from configuration or from the service
//! key of the target instance, read through the `cf` CLI.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::application::{ApplicationResult, CredentialError};
use crate::config::Settings;
use crate::domain::command::{PASSWORD_FLAG, USER_FLAG};
use crate::domain::{ClusterCredentials, DomainError, ParsedCommand};
use crate::infrastructure::traits::CommandRunner;

const NO_SERVICE_KEY_MARKER: &str = "No service key for service instance";
const GFSH_SUFFIX: &str = "/gemfire/v1";
const MANAGEMENT_SUFFIX: &str = "/management";

/// Resolves credentials for a target cluster.
pub trait CredentialProvider {
    fn credentials(&self, target: &str) -> ApplicationResult<ClusterCredentials>;
}

/// Provider returning fixed credentials for every target.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: ClusterCredentials,
}

impl StaticCredentialProvider {
    pub fn new(credentials: ClusterCredentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn credentials(&self, target: &str) -> ApplicationResult<ClusterCredentials> {
        debug!("credentials: static credentials for {}", target);
        Ok(self.credentials.clone())
    }
}

/// URLs published in a service key.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceKeyUrls {
    pub gfsh: Option<String>,
    pub management: Option<String>,
}

/// A user published in a service key.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceKeyUser {
    pub username: String,
    pub password: String,
}

/// The credentials object of a service key.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceKey {
    pub urls: ServiceKeyUrls,
    pub users: Vec<ServiceKeyUser>,
}

impl ServiceKey {
    /// First user whose name starts with `prefix`.
    pub fn operator(&self, prefix: &str) -> Option<&ServiceKeyUser> {
        self.users.iter().find(|u| u.username.starts_with(prefix))
    }

    /// Base URL of the management API.
    pub fn base_url(&self) -> Option<String> {
        let non_empty = |url: &Option<String>| url.clone().filter(|u| !u.trim().is_empty());
        if let Some(url) = non_empty(&self.urls.management) {
            let url = url.trim_end_matches('/');
            return Some(url.strip_suffix(MANAGEMENT_SUFFIX).unwrap_or(url).to_string());
        }
        non_empty(&self.urls.gfsh).map(|url| {
            let url = url.trim_end_matches('/');
            url.strip_suffix(GFSH_SUFFIX).unwrap_or(url).to_string()
        })
    }
}

/// Name of the first service key listed by `cf service-keys`.
///
/// The key names follow the `name` header row.
pub fn parse_service_key_name(output: &str) -> Option<String> {
    if output.contains(NO_SERVICE_KEY_MARKER) {
        return None;
    }
    let mut after_header = false;
    for line in output.lines() {
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        if after_header {
            return Some(first.to_string());
        }
        if first == "name" {
            after_header = true;
        }
    }
    None
}

/// Parse the output of `cf service-key`.
///
/// The JSON starts at the first `{`; the key may be wrapped in `credentials`.
pub fn parse_service_key(output: &str) -> Result<ServiceKey, String> {
    let start = output
        .find('{')
        .ok_or_else(|| "no JSON object in output".to_string())?;
    let mut value: Value = serde_json::from_str(&output[start..]).map_err(|e| e.to_string())?;
    if let Some(inner) = value.get_mut("credentials") {
        value = inner.take();
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Provider reading the service key of the target through the `cf` CLI.
pub struct CfCredentialProvider {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl CfCredentialProvider {
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self { cmd, settings }
    }

    /// Run `cf <args>`, returning stdout on success and `None` on a non-zero exit.
    fn cf(&self, args: &[&str]) -> ApplicationResult<Option<String>> {
        let program = self.settings.cf_command.as_str();
        debug!("cf: {} {}", program, args.join(" "));
        let output = self
            .cmd
            .run(program, args)
            .map_err(|source| CredentialError::Runner {
                command: format!("{} {}", program, args.join(" ")),
                source,
            })?;
        if !output.status.success() {
            debug!(
                "cf: {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

impl CredentialProvider for CfCredentialProvider {
    fn credentials(&self, target: &str) -> ApplicationResult<ClusterCredentials> {
        let listing = self
            .cf(&["service-keys", target])?
            .ok_or_else(|| CredentialError::InvalidInstance {
                target: target.to_string(),
            })?;
        let key_name =
            parse_service_key_name(&listing).ok_or_else(|| CredentialError::NoServiceKey {
                target: target.to_string(),
            })?;
        info!("credentials: using service key '{}' of {}", key_name, target);

        let invalid = |reason: String| CredentialError::InvalidServiceKeyResponse {
            target: target.to_string(),
            reason,
        };
        let raw = self
            .cf(&["service-key", target, &key_name])?
            .ok_or_else(|| invalid(format!("cf service-key {target} {key_name} failed")))?;
        let key = parse_service_key(&raw).map_err(invalid)?;

        let prefix = self.settings.operator_user_prefix.as_str();
        let user = key
            .operator(prefix)
            .ok_or_else(|| CredentialError::NoOperatorUser {
                target: target.to_string(),
                prefix: prefix.to_string(),
            })?;
        let base_url = key
            .base_url()
            .ok_or_else(|| invalid("no management or gfsh URL".to_string()))?;
        debug!("credentials: {} at {}", user.username, base_url);

        Ok(ClusterCredentials::new(&user.username, &user.password, base_url))
    }
}

/// Apply `-u`/`-p` overrides; both or neither must be given.
pub fn apply_login_flags(
    credentials: ClusterCredentials,
    command: &ParsedCommand,
) -> Result<ClusterCredentials, DomainError> {
    match (command.flag(USER_FLAG), command.flag(PASSWORD_FLAG)) {
        (Some(user), Some(password)) => Ok(credentials.with_login(user, password)),
        (Some(_), None) => Err(DomainError::UsernameWithoutPassword),
        (None, Some(_)) => Err(DomainError::PasswordWithoutUsername),
        (None, None) => Ok(credentials),
    }
}
