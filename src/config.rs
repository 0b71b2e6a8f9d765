//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ciconf/ciconf.toml`
//! 3. Environment variables: `CICONF_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Default root config, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".circleci/config.yml";

/// Default bound on reference nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_config_path: Option<PathBuf>,
    pub max_depth: Option<usize>,
    pub host: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub migrate_command: Option<String>,
}

/// Unified configuration for ciconf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root config used when no path is given (default: .circleci/config.yml)
    pub default_config_path: PathBuf,
    /// Maximum reference nesting depth during composition
    pub max_depth: usize,
    /// Remote config service host
    pub host: String,
    /// GraphQL endpoint path on the host
    pub endpoint: String,
    /// API token sent as the Authorization header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// HTTP timeout for remote calls, in seconds
    pub timeout_secs: u64,
    /// Executable that performs legacy migration
    pub migrate_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            max_depth: DEFAULT_MAX_DEPTH,
            host: "https://circleci.com".into(),
            endpoint: "graphql-unstable".into(),
            token: None,
            timeout_secs: 30,
            migrate_command: "circleci-agent".into(),
        }
    }
}

/// Get the XDG config directory for ciconf.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ciconf").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ciconf.toml"))
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

impl Settings {
    /// Full URL of the GraphQL endpoint.
    pub fn graphql_url(&self) -> String {
        format!(
            "{}/{}",
            self.host.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.default_config_path.to_string_lossy().as_ref());
        self.default_config_path = PathBuf::from(expanded);

        self.migrate_command = expand_env_vars(&self.migrate_command);
    }

    /// Overlay wins field by field where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_config_path: overlay
                .default_config_path
                .clone()
                .unwrap_or_else(|| self.default_config_path.clone()),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            host: overlay.host.clone().unwrap_or_else(|| self.host.clone()),
            endpoint: overlay
                .endpoint
                .clone()
                .unwrap_or_else(|| self.endpoint.clone()),
            token: overlay.token.clone().or_else(|| self.token.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            migrate_command: overlay
                .migrate_command
                .clone()
                .unwrap_or_else(|| self.migrate_command.clone()),
        }
    }

    /// Load settings from the global config file and environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence from an explicit global file.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. `global_path`, if it exists
    /// 3. Environment variables: `CICONF_*` prefix
    pub fn load_from(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply CICONF_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("CICONF")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("default_config_path") {
            settings.default_config_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("max_depth") {
            settings.max_depth = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("CICONF_MAX_DEPTH={val}: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("host") {
            settings.host = val;
        }
        if let Ok(val) = config.get_string("endpoint") {
            settings.endpoint = val;
        }
        if let Ok(val) = config.get_string("token") {
            settings.token = Some(val);
        }
        if let Ok(val) = config.get_string("timeout_secs") {
            settings.timeout_secs = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("CICONF_TIMEOUT_SECS={val}: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("migrate_command") {
            settings.migrate_command = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# ciconf configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/ciconf/ciconf.toml
#   Env:    CICONF_* environment variables (explicit overrides)

# Root config used when no PATH argument is given
# default_config_path = ".circleci/config.yml"

# Maximum nesting of `include` references while collapsing
# max_depth = 256

# Remote config service used by `validate` and `expand`
# host = "https://circleci.com"
# endpoint = "graphql-unstable"
# token = "..."
# timeout_secs = 30

# Executable that performs `migrate`
# migrate_command = "circleci-agent"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
