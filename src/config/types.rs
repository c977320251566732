//! Configuration type definitions.
//!
//! These types are pure data - no I/O or complex logic.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::build::paths::TEMPLATE_DIR_NAME;
use crate::build::resolver::DEFAULT_MAX_ITERATIONS;

/// The contents of `stitch.yaml`.
///
/// ```yaml
/// templates: ./template_src
/// output: ./public
/// syntax: keyword
/// existing_output: backup
/// backup_dir: /tmp
/// nav:
///   template: header
///   active_class: active
/// vars:
///   site_name: My favorite site
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<name>.template.html` fragments
    pub templates: PathBuf,

    /// Directory expanded pages are written to (defaults to the tool directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Directory previous outputs are moved to (defaults to the OS temp dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Marker syntax
    pub syntax: Syntax,

    /// What to do with an output file that already exists
    pub existing_output: ExistingOutput,

    /// Upper bound on markers resolved per document
    pub max_iterations: usize,

    /// Navigation highlighting
    pub nav: NavConfig,

    /// Variables every document starts with
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates: PathBuf::from(TEMPLATE_DIR_NAME),
            output: None,
            backup_dir: None,
            syntax: Syntax::default(),
            existing_output: ExistingOutput::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            nav: NavConfig::default(),
            vars: BTreeMap::new(),
        }
    }
}

/// Marker syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// `{{include name}}`, `{{setenv key=value}}`, `{{get key}}`, resolved
    /// until no markers remain
    #[default]
    Keyword,
    /// `{{{name}}}` includes only, resolved in one pass
    Bare,
}

/// Handling of an output file that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingOutput {
    /// Move it to a timestamped `.bkp` file first
    #[default]
    Backup,
    /// Replace it
    Overwrite,
}

/// Which fragment gets nav highlighting, and the class it adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub template: String,
    pub active_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            template: "header".to_string(),
            active_class: "active".to_string(),
        }
    }
}
