//! API definition: the per-API configuration snapshot the middleware chain reads

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::secret::SecretString;
use crate::errors::EdgewardError;

/// API definition
///
/// Only the blocks the gateway core needs are modelled; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSpec {
    /// Unique API identifier
    pub api_id: String,

    /// Human-readable API name
    pub name: String,

    /// Organisation owning the API
    pub org_id: String,

    /// Credentials injected into requests sent to the upstream
    pub upstream_auth: UpstreamAuth,

    /// Native analytics plugin
    pub analytics_plugin: AnalyticsPluginConfig,
}

/// Upstream authentication block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpstreamAuth {
    /// Master switch for every upstream auth kind
    pub enabled: bool,

    /// Basic auth towards the upstream
    pub basic_auth: UpstreamBasicAuth,
}

/// Basic authentication towards the upstream
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpstreamBasicAuth {
    pub enabled: bool,
    pub username: String,
    pub password: SecretString,

    /// Header to carry the credentials, `Authorization` when unset
    pub header_name: Option<String>,
}

impl UpstreamBasicAuth {
    /// Configured header name, treating an empty string as unset
    pub fn header_name(&self) -> Option<&str> {
        self.header_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Whether username or password is empty.
    ///
    /// Such a configuration still produces credentials (`":"` encoded); this
    /// only lets callers flag it.
    pub fn has_empty_credentials(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }
}

/// Native analytics plugin configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsPluginConfig {
    pub enabled: bool,

    /// Shared library to open
    pub plugin_path: PathBuf,

    /// Exported symbol holding the handler
    pub func_name: String,
}

/// Serialization format of an API definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

impl ApiSpec {
    /// Load an API definition from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EdgewardError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(EdgewardError::Io)?;

        let spec = Self::parse(&content, ConfigFormat::from_path(path))?;
        tracing::debug!(path = %path.display(), api_id = %spec.api_id, "Loaded API definition");
        Ok(spec)
    }

    /// Parse an API definition from a string
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, EdgewardError> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| EdgewardError::Config(format!("Failed to parse API definition: {}", e))),
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| EdgewardError::Config(format!("Failed to parse API definition: {}", e))),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| EdgewardError::Config(format!("Failed to parse API definition: {}", e))),
        }
    }
}
