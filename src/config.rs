//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pccctl/pccctl.toml`
//! 3. Explicit config file given with `--config`
//! 4. Legacy environment variables: `CFPCC`, `CFLOGIN`, `CFPASSWORD`, `CFENDPOINT`
//! 5. Environment variables: `PCCCTL_*` prefix, `__` between nested keys

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::ClusterCredentials;

/// Environment variable holding the default target.
pub const LEGACY_TARGET_VAR: &str = "CFPCC";
/// Legacy credential environment variables: username, password, endpoint.
pub const LEGACY_LOGIN_VAR: &str = "CFLOGIN";
pub const LEGACY_PASSWORD_VAR: &str = "CFPASSWORD";
pub const LEGACY_ENDPOINT_VAR: &str = "CFENDPOINT";

/// Explicit cluster credentials, bypassing the service broker.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CredentialSettings {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Base URL of the management API
    pub endpoint: Option<String>,
}

impl CredentialSettings {
    /// Credentials when username, password and endpoint are all set.
    pub fn complete(&self) -> Option<ClusterCredentials> {
        match (&self.username, &self.password, &self.endpoint) {
            (Some(user), Some(password), Some(endpoint))
                if !user.is_empty() && !password.is_empty() && !endpoint.is_empty() =>
            {
                Some(ClusterCredentials::new(user, password, endpoint))
            }
            _ => None,
        }
    }

    fn merge(&self, overlay: &CredentialSettings) -> Self {
        Self {
            username: overlay.username.clone().or_else(|| self.username.clone()),
            password: overlay.password.clone().or_else(|| self.password.clone()),
            endpoint: overlay.endpoint.clone().or_else(|| self.endpoint.clone()),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpSettings {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Accept self-signed cluster certificates
    pub accept_invalid_certs: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

/// Raw HTTP settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawHttpSettings {
    pub timeout_secs: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_target: Option<String>,
    pub cf_command: Option<String>,
    pub operator_user_prefix: Option<String>,
    pub credentials: CredentialSettings,
    pub http: RawHttpSettings,
}

/// Unified configuration for pccctl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Target used when the command line does not start with it
    pub default_target: Option<String>,
    /// Service broker CLI executable (default: cf)
    pub cf_command: String,
    /// Service key user to authenticate as
    pub operator_user_prefix: String,
    pub credentials: CredentialSettings,
    pub http: HttpSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_target: None,
            cf_command: "cf".into(),
            operator_user_prefix: "cluster_operator".into(),
            credentials: CredentialSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

/// Get the XDG config directory for pccctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pccctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pccctl.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_target: overlay
                .default_target
                .clone()
                .or_else(|| self.default_target.clone()),
            cf_command: overlay
                .cf_command
                .clone()
                .unwrap_or_else(|| self.cf_command.clone()),
            operator_user_prefix: overlay
                .operator_user_prefix
                .clone()
                .unwrap_or_else(|| self.operator_user_prefix.clone()),
            credentials: self.credentials.merge(&overlay.credentials),
            http: HttpSettings {
                timeout_secs: overlay.http.timeout_secs.unwrap_or(self.http.timeout_secs),
                accept_invalid_certs: overlay
                    .http
                    .accept_invalid_certs
                    .unwrap_or(self.http.accept_invalid_certs),
            },
        }
    }

    /// Load settings from the global config, an optional explicit file and
    /// the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_layers(global_config_path().as_deref(), config_file, &env)
    }

    /// Load settings with layered precedence from explicit sources.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load_layers(
        global_file: Option<&Path>,
        config_file: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_file {
            if global_path.exists() {
                debug!("load_layers: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            debug!("load_layers: config file {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Legacy plugin variables
        current = Self::apply_legacy_env(current, env);

        // 5. PCCCTL_* variables
        Self::apply_env_overrides(current, env)
    }

    /// Apply the CF* variables understood by the cf plugin.
    fn apply_legacy_env(mut settings: Self, env: &HashMap<String, String>) -> Self {
        let var = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

        if let Some(target) = var(LEGACY_TARGET_VAR) {
            settings.default_target = Some(target);
        }
        if let Some(user) = var(LEGACY_LOGIN_VAR) {
            settings.credentials.username = Some(user);
        }
        if let Some(password) = var(LEGACY_PASSWORD_VAR) {
            settings.credentials.password = Some(password);
        }
        if let Some(endpoint) = var(LEGACY_ENDPOINT_VAR) {
            settings.credentials.endpoint = Some(endpoint);
        }
        settings
    }

    /// Apply PCCCTL_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: &HashMap<String, String>,
    ) -> Result<Self, ApplicationError> {
        let source: config::Map<String, String> = env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PCCCTL")
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(source)),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_target") {
            settings.default_target = Some(val);
        }
        if let Ok(val) = config.get_string("cf_command") {
            settings.cf_command = val;
        }
        if let Ok(val) = config.get_string("operator_user_prefix") {
            settings.operator_user_prefix = val;
        }
        if let Ok(val) = config.get_string("credentials.username") {
            settings.credentials.username = Some(val);
        }
        if let Ok(val) = config.get_string("credentials.password") {
            settings.credentials.password = Some(val);
        }
        if let Ok(val) = config.get_string("credentials.endpoint") {
            settings.credentials.endpoint = Some(val);
        }
        if let Ok(val) = config.get_string("http.timeout_secs") {
            settings.http.timeout_secs = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("PCCCTL_HTTP__TIMEOUT_SECS={val}: {e}"),
            })?;
        }
        if let Ok(val) = config.get_bool("http.accept_invalid_certs") {
            settings.http.accept_invalid_certs = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML, password masked.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        if shown.credentials.password.is_some() {
            shown.credentials.password = Some("***".into());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}
