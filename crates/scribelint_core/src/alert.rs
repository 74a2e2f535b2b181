//! Alert and severity types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use scribelint_ast::Span;

/// Severity level of a rule and its alerts.
///
/// Levels form a total order: an alert is emitted iff its level is at or
/// above the configured minimum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth considering.
    Suggestion,
    /// Should be reviewed.
    #[default]
    Warning,
    /// Must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Suggestion => write!(f, "suggestion"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suggestion" => Ok(Severity::Suggestion),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!(
                "level must be 'suggestion', 'warning', or 'error', got '{other}'"
            )),
        }
    }
}

/// A remediation hint attached to an alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The kind of action (`suggest` is the only built-in).
    #[serde(default)]
    pub name: String,
    /// Action parameters (e.g. the replacement candidates).
    #[serde(default)]
    pub params: Vec<String>,
}

/// A single diagnostic produced by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Fully-qualified rule name, `Style.Rule`.
    pub check: String,
    /// The rule's description.
    #[serde(default)]
    pub description: String,
    /// The filled message template.
    pub message: String,
    /// The severity of the rule that fired.
    pub severity: Severity,
    /// The offending text.
    pub r#match: String,
    /// 1-indexed line of the match.
    pub line: u32,
    /// 1-indexed column range of the match on that line.
    pub span: (u32, u32),
    /// Byte offsets of the match in the source document.
    pub offset: Span,
    /// Documentation link for the rule.
    #[serde(default)]
    pub link: String,
    /// Optional remediation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Alert {
    /// Sort key used within a document: line, then column, then rule name.
    pub fn sort_key(&self) -> (u32, u32, &str) {
        (self.line, self.span.0, &self.check)
    }
}
