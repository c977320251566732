//! The marker resolver.
//!
//! Rewrites a document until no markers remain. A [`Profile`] picks the
//! marker syntax and whether spliced text is scanned again:
//!
//! - `keyword`: `{{include name}}`, `{{setenv key=value}}`, `{{get key}}`,
//!   resolved one marker at a time against the updated document, so
//!   included fragments may contain further markers.
//! - `bare`: `{{{name}}}` includes, resolved in a single left-to-right pass;
//!   markers inside included fragments are left as they are.

use std::path::Path;

use tracing::{debug, warn};

use super::environment::Environment;
use super::marker::{self, Delimiters, Directive, Grammar, MarkerError};
use super::nav;
use super::template::{TemplateError, TemplateStore};
use crate::config::{NavConfig, Syntax};

/// Default bound on markers resolved per document.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("template '{0}' includes itself")]
    IncludeCycle(String),

    #[error("markers still unresolved after {0} expansions (recursive includes?)")]
    ExpansionLimit(usize),
}

/// Whether spliced text is scanned for more markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Iterative,
    Single,
}

/// Marker syntax and resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub delimiters: Delimiters,
    pub grammar: Grammar,
    pub pass: Pass,
}

impl Profile {
    pub fn keyword() -> Self {
        Self {
            delimiters: Delimiters::DOUBLE,
            grammar: Grammar::Keyword,
            pass: Pass::Iterative,
        }
    }

    pub fn bare() -> Self {
        Self {
            delimiters: Delimiters::TRIPLE,
            grammar: Grammar::Bare,
            pass: Pass::Single,
        }
    }
}

impl From<Syntax> for Profile {
    fn from(syntax: Syntax) -> Self {
        match syntax {
            Syntax::Keyword => Self::keyword(),
            Syntax::Bare => Self::bare(),
        }
    }
}

pub struct Resolver {
    templates: TemplateStore,
    profile: Profile,
    nav: NavConfig,
    max_iterations: usize,
}

impl Resolver {
    pub fn new(templates: TemplateStore, profile: Profile) -> Self {
        Self {
            templates,
            profile,
            nav: NavConfig::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_nav(mut self, nav: NavConfig) -> Self {
        self.nav = nav;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Resolve every marker in `doc`.
    ///
    /// `output_path` is only used for the nav-highlight rewrite. A document
    /// without markers is returned unchanged; otherwise leading whitespace is
    /// trimmed from the result.
    pub fn resolve(
        &self,
        doc: &str,
        env: &mut Environment,
        output_path: &Path,
    ) -> Result<String, ResolveError> {
        let resolved = match self.profile.pass {
            Pass::Iterative => self.resolve_iterative(doc, env, output_path)?,
            Pass::Single => self.resolve_single(doc, env, output_path)?,
        };

        Ok(match resolved {
            Some(doc) => doc.trim_start().to_string(),
            None => doc.to_string(),
        })
    }

    /// Returns `None` when the document had no markers.
    fn resolve_iterative(
        &self,
        doc: &str,
        env: &mut Environment,
        output_path: &Path,
    ) -> Result<Option<String>, ResolveError> {
        let mut doc = doc.to_string();
        let mut expansions = 0;

        while let Some(found) = marker::find_first(&doc, self.profile.delimiters, 0) {
            if expansions == self.max_iterations {
                return Err(ResolveError::ExpansionLimit(self.max_iterations));
            }
            expansions += 1;

            let (start, end) = (found.start, found.end);
            let text = found.text.to_string();
            let directive = self.profile.grammar.parse(found.body)?;
            debug!(marker = %found.body, "resolving marker");

            let replacement = self.apply(&directive, &text, env, output_path)?;
            doc.replace_range(start..end, &replacement);
        }

        Ok((expansions > 0).then_some(doc))
    }

    fn resolve_single(
        &self,
        doc: &str,
        env: &mut Environment,
        output_path: &Path,
    ) -> Result<Option<String>, ResolveError> {
        let mut out = String::with_capacity(doc.len());
        let mut cursor = 0;
        let mut expansions = 0;

        for found in marker::find_all(doc, self.profile.delimiters) {
            let directive = self.profile.grammar.parse(found.body)?;
            debug!(marker = %found.body, "resolving marker");

            out.push_str(&doc[cursor..found.start]);
            out.push_str(&self.apply(&directive, found.text, env, output_path)?);
            cursor = found.end;
            expansions += 1;
        }

        if expansions == 0 {
            return Ok(None);
        }

        out.push_str(&doc[cursor..]);
        Ok(Some(out))
    }

    /// Compute the text that replaces one marker.
    fn apply(
        &self,
        directive: &Directive,
        marker_text: &str,
        env: &mut Environment,
        output_path: &Path,
    ) -> Result<String, ResolveError> {
        match directive {
            Directive::Include { name, params } => {
                let mut fragment = self.templates.load(name)?;

                if self.profile.pass == Pass::Iterative && fragment.contains(marker_text) {
                    return Err(ResolveError::IncludeCycle(name.clone()));
                }

                if *name == self.nav.template {
                    fragment = nav::highlight_active(&fragment, output_path, &self.nav.active_class);
                }

                if !params.is_empty() {
                    fragment = self.bind_params(&fragment, params);
                }

                Ok(fragment)
            }
            Directive::SetEnv { key, value } => {
                debug!(%key, %value, "setting variable");
                env.set(key.as_str(), value.as_str());
                Ok(String::new())
            }
            Directive::Get { key } => match env.get(key) {
                Some(value) => Ok(value.to_string()),
                None => {
                    warn!(%key, "variable is not set, substituting ''");
                    Ok(String::new())
                }
            },
        }
    }

    /// Substitute include parameters into the fragment's own `get` markers.
    ///
    /// Markers that don't name a parameter are kept verbatim and resolve
    /// later against the document environment.
    fn bind_params(&self, fragment: &str, params: &[(String, String)]) -> String {
        let mut out = String::with_capacity(fragment.len());
        let mut cursor = 0;

        for found in marker::find_all(fragment, self.profile.delimiters) {
            let Ok(Directive::Get { key }) = self.profile.grammar.parse(found.body) else {
                continue;
            };
            if let Some((_, value)) = params.iter().find(|(name, _)| *name == key) {
                out.push_str(&fragment[cursor..found.start]);
                out.push_str(value);
                cursor = found.end;
            }
        }

        out.push_str(&fragment[cursor..]);
        out
    }
}
