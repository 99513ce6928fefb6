//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeshift/treeshift.toml`
//! 3. Local config: `<dir>/.treeshift.toml`
//! 4. Environment variables: `TREESHIFT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Unified configuration for treeshift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Record field holding the node id
    pub id_field: String,
    /// Record field holding the parent id (flat records only)
    pub parent_field: String,
    /// Field holding the nested children array
    pub children_field: String,
    /// Fail on cycles and dangling parents when building
    pub strict: bool,
    /// Separator between ids in paths given on the command line
    pub path_separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id_field: "id".into(),
            parent_field: "parentId".into(),
            children_field: "children".into(),
            strict: false,
            path_separator: "/".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub id_field: Option<String>,
    pub parent_field: Option<String>,
    pub children_field: Option<String>,
    pub strict: Option<bool>,
    pub path_separator: Option<String>,
}

/// Get the XDG config directory for treeshift.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeshift").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeshift.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treeshift.toml")
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
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            id_field: overlay
                .id_field
                .clone()
                .unwrap_or_else(|| self.id_field.clone()),
            parent_field: overlay
                .parent_field
                .clone()
                .unwrap_or_else(|| self.parent_field.clone()),
            children_field: overlay
                .children_field
                .clone()
                .unwrap_or_else(|| self.children_field.clone()),
            strict: overlay.strict.unwrap_or(self.strict),
            path_separator: overlay
                .path_separator
                .clone()
                .unwrap_or_else(|| self.path_separator.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory searched for `.treeshift.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!(path = %local_path.display(), "loading local config");
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply TREESHIFT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREESHIFT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("id_field") {
            settings.id_field = val;
        }
        if let Ok(val) = config.get_string("parent_field") {
            settings.parent_field = val;
        }
        if let Ok(val) = config.get_string("children_field") {
            settings.children_field = val;
        }
        if let Ok(val) = config.get_bool("strict") {
            settings.strict = val;
        }
        if let Ok(val) = config.get_string("path_separator") {
            settings.path_separator = val;
        }

        Ok(settings)
    }

    /// Reject settings no document could be read with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let fields = [
            ("id_field", &self.id_field),
            ("parent_field", &self.parent_field),
            ("children_field", &self.children_field),
            ("path_separator", &self.path_separator),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(ApplicationError::Config {
                    message: format!("{name} must not be empty"),
                });
            }
        }
        if self.children_field == self.id_field {
            return Err(ApplicationError::Config {
                message: "children_field must differ from id_field".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeshift configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeshift/treeshift.toml
#   Local:  <dir>/.treeshift.toml  (dir given with -C, default cwd)
#   Env:    TREESHIFT_* environment variables

# Field holding the node id
# id_field = "id"

# Field holding the parent id in flat records
# parent_field = "parentId"

# Field holding nested children
# children_field = "children"

# Fail on cycles and dangling parent ids when building trees
# strict = false

# Separator between ids in --dragged/--target paths
# path_separator = "/"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
