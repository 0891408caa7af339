//! Local mirror configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_root() -> String {
    String::from("docs")
}

fn default_extensions() -> Vec<String> {
    vec![String::from("md")]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory the remote hierarchy is mirrored under.
    #[serde(default = "default_root")]
    pub root: String,

    /// Re-download files that already exist locally.
    #[serde(default)]
    pub overwrite: bool,

    /// File extensions (without the dot) that are mirrored.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            overwrite: false,
            extensions: default_extensions(),
        }
    }
}

impl OutputConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.root.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.root".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.extensions".into(),
                reason: "at least one extension is required".into(),
            });
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(ConfigError::InvalidValue {
                field: "output.extensions".into(),
                reason: format!("'{bad}' must be a bare extension like 'md'"),
            });
        }
        Ok(())
    }
}
