//! Configuration loading and types for stitch.
//!
//! - Type definitions for config structures (`types`)
//! - Loading configs from files and the environment (`load`)

mod load;
mod types;

use std::path::{Path, PathBuf};

pub use types::{Config, ExistingOutput, NavConfig, Syntax};

use crate::build::paths::resolve_against;

/// File name looked up in the tool directory when no config is given.
pub const DEFAULT_CONFIG_FILE: &str = "stitch.yaml";

/// Prefix of environment variables that override config values.
pub const ENV_PREFIX: &str = "STITCH";

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("config path is not valid UTF-8: {}", .0.display())]
    EncodePath(PathBuf),

    #[error("{0}")]
    Validation(String),
}

// =============================================================================
// Path resolution
// =============================================================================

impl Config {
    /// Make relative paths absolute against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.templates = resolve_against(base, &self.templates);
        self.output = self.output.map(|p| resolve_against(base, &p));
        self.backup_dir = self.backup_dir.map(|p| resolve_against(base, &p));
        self
    }

    /// Check values the type system can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Validation(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.nav.template.trim().is_empty() {
            return Err(ConfigError::Validation(
                "nav.template must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
