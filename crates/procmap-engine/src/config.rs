//! Repository configuration
//!
//! ```toml
//! batch_failure_policy = "rollback_on_failure"
//! ```

use procmap_core::errors::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// What a batch insert does when one of its rows fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Record the failure, keep going, and commit whatever succeeded
    #[default]
    ContinueAndCommit,
    /// Roll back on the first failing row and return its error
    RollbackOnFailure,
}

/// Settings for a [`Repository`](crate::Repository)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    pub batch_failure_policy: BatchFailurePolicy,
}

impl RepositoryConfig {
    pub fn with_batch_failure_policy(mut self, policy: BatchFailurePolicy) -> Self {
        self.batch_failure_policy = policy;
        self
    }

    /// Parse from TOML text; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// `Config` when the text is not valid TOML or names an unknown key or
    /// policy.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MapError::Config {
            reason: e.to_string(),
        })
    }

    /// Load from a TOML file
    ///
    /// # Errors
    ///
    /// `Config` when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| MapError::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        contents.parse()
    }
}

impl FromStr for RepositoryConfig {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s)
    }
}
