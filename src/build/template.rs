use std::path::{Path, PathBuf};

/// File name suffix of a template fragment.
pub const TEMPLATE_SUFFIX: &str = ".template.html";

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("template not found: {}", path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Loads template fragments from a directory.
///
/// A fragment named `header` lives at `<dir>/header.template.html`.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a fragment name maps to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{TEMPLATE_SUFFIX}"))
    }

    /// Load a fragment's text verbatim.
    pub fn load(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(TemplateError::NotFound {
                name: name.to_string(),
                path,
            });
        }

        std::fs::read_to_string(&path).map_err(|source| TemplateError::Read { path, source })
    }
}
