//! Repository configuration file support.
//!
//! This module provides utilities for reading repository configuration from
//! TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RepositoryError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read repository config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, RepositoryError> {
        toml::from_str(contents).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository config: {}", e))
        })
    }

    /// The configured repository type.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repository.repo_type)
            .map_err(RepositoryError::configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let config = RepositoryConfig::from_toml("[repository]\ntype = \"local\"\n").unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let config = RepositoryConfig::from_toml("[repository]\ntype = \"oracle\"\n").unwrap();
        assert!(config.repository_type().is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(RepositoryConfig::from_toml("repository = ").is_err());
    }
}
