//! # crs-config
//!
//! Layered configuration loading for crs-mirror using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CRS_MIRROR_*` prefix, `__` as separator)
//! 2. `GITLAB_API_KEY`, accepted as an alias for `gitlab.token`
//! 3. Project-level `crs-mirror.toml` in the current directory
//! 4. User-level `~/.config/crs-mirror/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CRS_MIRROR_GITLAB__TOKEN` -> `gitlab.token`,
//! `CRS_MIRROR_OUTPUT__ROOT` -> `output.root`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use crs_config::MirrorConfig;
//!
//! let config = MirrorConfig::load_with_dotenv(None).expect("config");
//! config.validate().expect("usable config");
//! println!("mirroring {} into {}", config.gitlab.root_group, config.output.root);
//! ```

mod error;
mod gitlab;
mod output;
mod retry;

pub use error::ConfigError;
pub use gitlab::GitLabConfig;
pub use output::OutputConfig;
pub use retry::RetryConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CRS_MIRROR_";

/// Token variable read by earlier tooling; kept as a fallback.
pub const LEGACY_TOKEN_VAR: &str = "GITLAB_API_KEY";

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "crs-mirror.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub gitlab: GitLabConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl MirrorConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env` files; use [`Self::load_with_dotenv`] for that.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after populating the environment from a `.env` file.
    ///
    /// With `env_file`, that file must exist and parse. Without it, a `.env`
    /// in the current directory or one of its parents is used if present.
    /// Variables already set in the process environment are never replaced.
    pub fn load_with_dotenv(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_dotenv(env_file)?;
        Self::load()
    }

    /// Populate the process environment from a `.env` file, as
    /// [`Self::load_with_dotenv`] does, without extracting a config.
    pub fn load_dotenv(env_file: Option<&Path>) -> Result<(), ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|source| ConfigError::Dotenv {
                    path: path.display().to_string(),
                    source,
                })?;
            }
            None => {
                let _ = dotenvy::dotenv();
            }
        }
        Ok(())
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::figment_with_global(Self::global_config_path().as_deref())
    }

    /// The same provider chain as [`Self::figment`], with `global_config`
    /// in place of the user-level config file (`None` skips that layer).
    pub fn figment_with_global(global_config: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = global_config.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: legacy token variable
        figment = figment.merge(
            Env::raw()
                .only(&[LEGACY_TOKEN_VAR])
                .map(|_| "gitlab.token".into()),
        );

        // Layer 4: prefixed environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject configurations the mirror cannot run with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] for a missing token or starting group,
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gitlab.validate()?;
        self.output.validate()?;
        self.retry.validate()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("crs-mirror").join("config.toml"))
    }
}
