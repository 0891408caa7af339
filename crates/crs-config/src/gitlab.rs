//! GitLab connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_api_base_url() -> String {
    String::from("https://gitlab.com/api/v4")
}

/// GitLab caps `per_page` at 100.
const fn default_per_page() -> u32 {
    100
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitLabConfig {
    /// REST API root including the version, e.g. `https://gitlab.example.com/api/v4`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Personal or group access token with `read_api` scope.
    #[serde(default)]
    pub token: String,

    /// Starting group, by full path (`otc/backend`) or numeric id.
    #[serde(default)]
    pub root_group: String,

    /// Branch, tag or commit to read trees and files from.
    /// Empty means each project's default branch.
    #[serde(default)]
    pub git_ref: String,

    /// Page size for listing calls.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token: String::new(),
            root_group: String::new(),
            git_ref: String::new(),
            per_page: default_per_page(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GitLabConfig {
    /// Check if the token and starting group are set.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.root_group.is_empty()
    }

    /// The configured ref, if any.
    pub fn git_ref(&self) -> Option<&str> {
        Some(self.git_ref.as_str()).filter(|r| !r.is_empty())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "gitlab.token".into(),
            });
        }
        if self.root_group.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "gitlab.root_group".into(),
            });
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "gitlab.api_base_url".into(),
                reason: format!("'{}' is not an http(s) URL", self.api_base_url),
            });
        }
        if !(1..=100).contains(&self.per_page) {
            return Err(ConfigError::InvalidValue {
                field: "gitlab.per_page".into(),
                reason: format!("{} is outside 1..=100", self.per_page),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gitlab.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> GitLabConfig {
        GitLabConfig {
            token: "glpat-test".into(),
            root_group: "otc".into(),
            ..Default::default()
        }
    }

    #[test]
    fn default_is_not_configured() {
        let config = GitLabConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.api_base_url, "https://gitlab.com/api/v4");
        assert_eq!(config.per_page, 100);
        assert!(config.git_ref().is_none());
    }

    #[test]
    fn missing_token_is_not_configured() {
        let config = GitLabConfig {
            token: String::new(),
            ..configured()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { section } if section == "gitlab.token"));
    }

    #[test]
    fn per_page_out_of_range_is_invalid() {
        let config = GitLabConfig {
            per_page: 250,
            ..configured()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "gitlab.per_page"));
    }

    #[test]
    fn non_http_base_url_is_invalid() {
        let config = GitLabConfig {
            api_base_url: "gitlab.example.com/api/v4".into(),
            ..configured()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn git_ref_is_exposed_when_set() {
        let config = GitLabConfig {
            git_ref: "master".into(),
            ..configured()
        };
        assert_eq!(config.git_ref(), Some("master"));
        assert!(config.validate().is_ok());
    }
}
