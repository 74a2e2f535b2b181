//! Shared pattern-building for rule compilation, and the raw match type
//! every kind produces.

use regex::Regex;
use scribelint_ast::Span;

use crate::error::ConfigError;
use crate::rule::yaml::RuleMap;

/// A raw match inside one block, before offset translation and alert
/// assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOut {
    /// Block-relative byte span of the match.
    pub span: Span,
    /// The matched text.
    pub matched: String,
    /// Arguments for the message template's `%s` holes.
    pub args: Vec<String>,
    /// Replacement candidates, surfaced through the rule's action.
    pub suggestions: Vec<String>,
}

impl MatchOut {
    pub fn new(start: usize, end: usize, matched: impl Into<String>) -> Self {
        let matched = matched.into();
        Self {
            span: Span::new(start as u32, end as u32),
            args: vec![matched.clone()],
            matched,
            suggestions: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// Joins user tokens into a non-capturing alternation, word-bounded unless
/// `nonword` is set.
pub fn token_group(tokens: &[String], nonword: bool) -> String {
    let joined = tokens.join("|");
    if nonword {
        format!("(?:{joined})")
    } else {
        format!("\\b(?:{joined})\\b")
    }
}

/// Prepends the case-insensitive flag when requested.
pub fn with_flags(ignorecase: bool, pattern: String) -> String {
    if ignorecase {
        format!("(?i){pattern}")
    } else {
        pattern
    }
}

/// Compiles a pattern, reporting failures against the named key.
pub fn compile_regex(map: &RuleMap<'_>, key: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| map.err(key, format!("invalid pattern: {e}")))
}

/// Builds an anchored alternation over `tokens` used for exception lookups;
/// `None` when there is nothing to except.
pub fn exception_pattern(
    map: &RuleMap<'_>,
    key: &str,
    tokens: &[String],
    ignorecase: bool,
) -> Result<Option<Regex>, ConfigError> {
    if tokens.is_empty() {
        return Ok(None);
    }
    let pattern = with_flags(ignorecase, format!("^(?:{})$", tokens.join("|")));
    compile_regex(map, key, &pattern).map(Some)
}
