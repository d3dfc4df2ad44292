//! Path template compilation and rendering.
//!
//! A template such as `/users/{id:\d+}/posts/{slug}` is split into literal
//! text and parameter tokens. Literals are regex-escaped, each parameter
//! becomes a named capture group (default body `[^/]+`), and the whole
//! expression is anchored at both ends. Leading and trailing slashes are not
//! significant: templates and request paths are both trimmed before they
//! meet, so `/users/` and `users` are the same route.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ParamVec;
use crate::error::RouterError;

/// Capture group body used when a token carries no `:constraint`.
pub const DEFAULT_CONSTRAINT: &str = "[^/]+";

#[allow(clippy::expect_used)]
static PARAM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("parameter name regex is valid")
});

/// Trim the slashes that do not take part in matching.
#[inline]
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param {
        name: Arc<str>,
        constraint: Option<String>,
    },
}

/// A compiled path template.
#[derive(Clone)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
    param_names: Vec<Arc<str>>,
    regex: Regex,
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("template", &self.template)
            .field("param_names", &self.param_names)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl PathPattern {
    /// Compile a path template.
    ///
    /// # Errors
    ///
    /// [`RouterError::MalformedRoute`] when a parameter name is not an
    /// identifier, braces are unbalanced, a name repeats, a constraint is
    /// empty, or the assembled expression does not compile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use switchyard::route::PathPattern;
    ///
    /// let pattern = PathPattern::compile(r"/users/{id:\d+}").unwrap();
    /// assert_eq!(pattern.regex_str(), r"^users/(?P<id>\d+)$");
    /// assert_eq!(pattern.param_names()[0].as_ref(), "id");
    /// ```
    pub fn compile(template: &str) -> Result<Self, RouterError> {
        let normalized = normalize_path(template);
        let segments = parse_segments(normalized, template)?;

        let mut pattern = String::with_capacity(normalized.len() + 8);
        pattern.push('^');
        let mut param_names: Vec<Arc<str>> = Vec::with_capacity(normalized.matches('{').count());

        for segment in &segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Param { name, constraint } => {
                    if param_names.contains(name) {
                        return Err(RouterError::malformed(
                            template,
                            format!("parameter '{name}' appears more than once"),
                        ));
                    }
                    pattern.push_str("(?P<");
                    pattern.push_str(name);
                    pattern.push('>');
                    pattern.push_str(constraint.as_deref().unwrap_or(DEFAULT_CONSTRAINT));
                    pattern.push(')');
                    param_names.push(Arc::clone(name));
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| RouterError::malformed(template, format!("invalid constraint: {e}")))?;

        Ok(Self {
            template: format!("/{normalized}"),
            segments,
            param_names,
            regex,
        })
    }

    /// The template with a single leading slash, e.g. `/users/{id}`.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in left-to-right order.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    #[must_use]
    pub fn regex_str(&self) -> &str {
        self.regex.as_str()
    }

    /// True when the template has no parameter tokens.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.param_names.is_empty()
    }

    /// Test a request path. Slashes at either end are ignored.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(normalize_path(path))
    }

    /// Match a request path and bind parameters in declaration order.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(normalize_path(path))?;
        Some(
            self.param_names
                .iter()
                .map(|name| {
                    let value = caps
                        .name(name)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                    (Arc::clone(name), value)
                })
                .collect(),
        )
    }

    /// Render a concrete URL by substituting parameter values verbatim.
    ///
    /// Values are not checked against constraints and are not URL-encoded.
    /// A token without a supplied value is dropped from the output rather
    /// than reported, so `/users/{id}` rendered with no values is `/users/`.
    #[must_use]
    pub fn render<K, V>(&self, params: &HashMap<K, V>) -> String
    where
        K: Borrow<str> + Eq + Hash,
        V: AsRef<str>,
    {
        let mut out = String::with_capacity(self.template.len());
        out.push('/');
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param { name, .. } => {
                    if let Some(value) = params.get(&**name) {
                        out.push_str(value.as_ref());
                    }
                }
            }
        }
        out
    }
}

fn parse_segments(normalized: &str, template: &str) -> Result<Vec<Segment>, RouterError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = normalized.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                // Constraints may contain quantifiers such as `\d{2,4}`. Escaped
                // braces and braces inside a character class are literal.
                let mut depth = 1usize;
                let mut class_depth = 0usize;
                let mut token = String::new();
                loop {
                    let Some(next) = chars.next() else {
                        return Err(RouterError::malformed(template, "unbalanced '{'"));
                    };
                    match next {
                        '\\' => {
                            token.push('\\');
                            if let Some(escaped) = chars.next() {
                                token.push(escaped);
                            }
                            continue;
                        }
                        '[' => class_depth += 1,
                        ']' if class_depth > 0 => class_depth -= 1,
                        '{' if class_depth == 0 => depth += 1,
                        '}' if class_depth == 0 => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    token.push(next);
                }
                segments.push(parse_token(&token, template)?);
            }
            '}' => return Err(RouterError::malformed(template, "unbalanced '}'")),
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_token(token: &str, template: &str) -> Result<Segment, RouterError> {
    let (name, constraint) = match token.split_once(':') {
        Some((name, constraint)) => (name, Some(constraint)),
        None => (token, None),
    };
    if !PARAM_NAME.is_match(name) {
        return Err(RouterError::malformed(
            template,
            format!("invalid parameter name '{name}'"),
        ));
    }
    if constraint.is_some_and(str::is_empty) {
        return Err(RouterError::malformed(
            template,
            format!("empty constraint for parameter '{name}'"),
        ));
    }
    Ok(Segment::Param {
        name: Arc::from(name),
        constraint: constraint.map(str::to_string),
    })
}
