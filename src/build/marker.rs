//! Marker scanning and classification.
//!
//! A marker is a bracket-delimited token such as `{{get title}}`. This module
//! only deals with text: finding markers for a delimiter pair and turning a
//! marker body into a [`Directive`]. Acting on directives is the resolver's job.

/// The opening and closing brackets of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: &'static str,
    pub close: &'static str,
}

impl Delimiters {
    /// `{{ ... }}`
    pub const DOUBLE: Self = Self {
        open: "{{",
        close: "}}",
    };

    /// `{{{ ... }}}`
    pub const TRIPLE: Self = Self {
        open: "{{{",
        close: "}}}",
    };
}

/// A marker located in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Byte offset of the opening delimiter
    pub start: usize,
    /// Byte offset just past the closing delimiter
    pub end: usize,
    /// The full marker text, delimiters included
    pub text: &'a str,
    /// The inner text with braces and surrounding whitespace stripped
    pub body: &'a str,
}

/// Find the first marker at or after byte offset `from`.
///
/// Matching is non-greedy and never crosses a line break: the marker closes
/// at the first closing delimiter on the same line as its opening delimiter.
pub fn find_first(doc: &str, delimiters: Delimiters, from: usize) -> Option<Marker<'_>> {
    let mut search = from;

    while let Some(offset) = doc.get(search..)?.find(delimiters.open) {
        let start = search + offset;
        let inner_start = start + delimiters.open.len();
        let line_end = doc[inner_start..]
            .find('\n')
            .map_or(doc.len(), |i| inner_start + i);

        if let Some(close) = doc[inner_start..line_end].find(delimiters.close) {
            let end = inner_start + close + delimiters.close.len();
            let text = &doc[start..end];
            return Some(Marker {
                start,
                end,
                text,
                body: marker_body(text),
            });
        }

        // Delimiters are ASCII, so the next byte is a char boundary
        search = start + 1;
    }

    None
}

/// Iterate over all non-overlapping markers, left to right.
pub fn find_all(doc: &str, delimiters: Delimiters) -> impl Iterator<Item = Marker<'_>> {
    let mut from = 0;
    std::iter::from_fn(move || {
        let marker = find_first(doc, delimiters, from)?;
        from = marker.end;
        Some(marker)
    })
}

fn marker_body(text: &str) -> &str {
    text.trim_matches(|c: char| c == '{' || c == '}' || c.is_whitespace())
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MarkerError {
    #[error("unknown marker '{0}'")]
    UnknownDirective(String),

    #[error("'{0}' marker is missing its argument")]
    MissingArgument(&'static str),

    #[error("malformed assignment '{0}': expected key=value")]
    MalformedAssignment(String),
}

/// What a marker asks the resolver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Inline `<name>.template.html`, binding `params` inside the fragment.
    Include {
        name: String,
        params: Vec<(String, String)>,
    },
    /// Bind a variable in the document environment.
    SetEnv { key: String, value: String },
    /// Substitute a variable's value.
    Get { key: String },
}

/// How marker bodies are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `include name(k=v,...)`, `setenv key=value`, `get key`
    Keyword,
    /// The whole body is a template name.
    Bare,
}

impl Grammar {
    /// Classify a marker body.
    pub fn parse(self, body: &str) -> Result<Directive, MarkerError> {
        match self {
            Grammar::Keyword => parse_keyword(body),
            Grammar::Bare => {
                if body.is_empty() {
                    return Err(MarkerError::MissingArgument("include"));
                }
                Ok(Directive::Include {
                    name: body.to_string(),
                    params: Vec::new(),
                })
            }
        }
    }
}

fn parse_keyword(body: &str) -> Result<Directive, MarkerError> {
    let (keyword, rest) = match body.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (body, ""),
    };

    match keyword {
        "include" => parse_include(rest),
        "setenv" => {
            if rest.is_empty() {
                return Err(MarkerError::MissingArgument("setenv"));
            }
            let (key, value) = parse_assignment(rest)?;
            Ok(Directive::SetEnv { key, value })
        }
        "get" => {
            if rest.is_empty() {
                return Err(MarkerError::MissingArgument("get"));
            }
            Ok(Directive::Get {
                key: rest.to_string(),
            })
        }
        _ => Err(MarkerError::UnknownDirective(body.to_string())),
    }
}

/// Parse `name` or `name(key=value, ...)`.
fn parse_include(rest: &str) -> Result<Directive, MarkerError> {
    let (name, params) = match rest.split_once('(') {
        Some((name, params)) => (name.trim(), params.trim_end()),
        None => (rest, ""),
    };

    if name.is_empty() {
        return Err(MarkerError::MissingArgument("include"));
    }

    let params = params.strip_suffix(')').unwrap_or(params);
    let params = params
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(parse_assignment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Directive::Include {
        name: name.to_string(),
        params,
    })
}

/// Split `key=value` on the first `=`; the value may contain more `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), MarkerError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| MarkerError::MalformedAssignment(s.to_string()))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(MarkerError::MalformedAssignment(s.to_string()));
    }

    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_double() {
        let doc = "<p>{{ get title }}</p>";
        let marker = find_first(doc, Delimiters::DOUBLE, 0).unwrap();
        assert_eq!(marker.start, 3);
        assert_eq!(marker.end, 18);
        assert_eq!(marker.text, "{{ get title }}");
        assert_eq!(marker.body, "get title");
    }

    #[test]
    fn test_find_first_is_non_greedy() {
        let doc = "{{get a}} and {{get b}}";
        let marker = find_first(doc, Delimiters::DOUBLE, 0).unwrap();
        assert_eq!(marker.text, "{{get a}}");
    }

    #[test]
    fn test_find_first_does_not_cross_lines() {
        let doc = "{{ broken\n}} then {{get x}}";
        let marker = find_first(doc, Delimiters::DOUBLE, 0).unwrap();
        assert_eq!(marker.body, "get x");
    }

    #[test]
    fn test_find_first_none() {
        assert!(find_first("<p>plain { text }</p>", Delimiters::DOUBLE, 0).is_none());
        assert!(find_first("{{get x}}", Delimiters::TRIPLE, 0).is_none());
        assert!(find_first("{{get x}}", Delimiters::DOUBLE, 50).is_none());
    }

    #[test]
    fn test_find_first_triple() {
        let doc = "<body>{{{header}}}</body>";
        let marker = find_first(doc, Delimiters::TRIPLE, 0).unwrap();
        assert_eq!(marker.text, "{{{header}}}");
        assert_eq!(marker.body, "header");
    }

    #[test]
    fn test_find_all() {
        let doc = "{{{a}}} x {{{b}}}\n{{{c}}}";
        let bodies: Vec<_> = find_all(doc, Delimiters::TRIPLE).map(|m| m.body).collect();
        assert_eq!(bodies, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_include() {
        let directive = Grammar::Keyword.parse("include header").unwrap();
        assert_eq!(
            directive,
            Directive::Include {
                name: "header".to_string(),
                params: vec![],
            }
        );
    }

    #[test]
    fn test_parse_include_with_params() {
        let directive = Grammar::Keyword
            .parse("include card(title=Hello, href=a.html?x=1)")
            .unwrap();
        assert_eq!(
            directive,
            Directive::Include {
                name: "card".to_string(),
                params: vec![
                    ("title".to_string(), "Hello".to_string()),
                    ("href".to_string(), "a.html?x=1".to_string()),
                ],
            }
        );
    }

    #[test]
    fn test_parse_include_bad_param() {
        let err = Grammar::Keyword.parse("include card(title)").unwrap_err();
        assert_eq!(err, MarkerError::MalformedAssignment("title".to_string()));
    }

    #[test]
    fn test_parse_setenv_keeps_later_equals() {
        let directive = Grammar::Keyword.parse("setenv query = a=b=c").unwrap();
        assert_eq!(
            directive,
            Directive::SetEnv {
                key: "query".to_string(),
                value: "a=b=c".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_setenv_without_equals() {
        let err = Grammar::Keyword.parse("setenv title").unwrap_err();
        assert_eq!(err, MarkerError::MalformedAssignment("title".to_string()));
    }

    #[test]
    fn test_parse_get() {
        let directive = Grammar::Keyword.parse("get title").unwrap();
        assert_eq!(
            directive,
            Directive::Get {
                key: "title".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown_and_missing() {
        assert_eq!(
            Grammar::Keyword.parse("included header").unwrap_err(),
            MarkerError::UnknownDirective("included header".to_string())
        );
        assert_eq!(
            Grammar::Keyword.parse("get").unwrap_err(),
            MarkerError::MissingArgument("get")
        );
        assert_eq!(
            Grammar::Keyword.parse("").unwrap_err(),
            MarkerError::UnknownDirective(String::new())
        );
    }

    #[test]
    fn test_parse_bare() {
        assert_eq!(
            Grammar::Bare.parse("footer").unwrap(),
            Directive::Include {
                name: "footer".to_string(),
                params: vec![],
            }
        );
        assert_eq!(
            Grammar::Bare.parse("").unwrap_err(),
            MarkerError::MissingArgument("include")
        );
    }
}
