//! Scope selectors.
//!
//! A selector is parsed from a string like `paragraph.!code`: positive tags
//! must appear in the scope path in order (not necessarily adjacent),
//! negated tags must be absent anywhere, `~` compares case-insensitively,
//! and `*` matches any single tag.

use scribelint_ast::ScopePath;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    tag: String,
    negate: bool,
    nocase: bool,
    wildcard: bool,
}

/// A compiled scope selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    sections: Vec<Section>,
}

impl Selector {
    /// Parses a selector expression. Empty input selects `text`.
    pub fn parse(expr: &str) -> Self {
        let expr = if expr.trim().is_empty() { "text" } else { expr };
        let sections = expr
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut tag = part;
                let mut negate = false;
                let mut nocase = false;
                loop {
                    if let Some(rest) = tag.strip_prefix('!') {
                        negate = true;
                        tag = rest;
                    } else if let Some(rest) = tag.strip_prefix('~') {
                        nocase = true;
                        tag = rest;
                    } else {
                        break;
                    }
                }
                Section {
                    wildcard: tag == "*",
                    tag: if nocase { tag.to_lowercase() } else { tag.to_string() },
                    negate,
                    nocase,
                }
            })
            .collect();
        Self { sections }
    }

    /// Returns true if the selector matches the given scope path.
    ///
    /// Matching is a single pass over the path: positive sections are
    /// consumed as an ordered subsequence, negated sections fail the match
    /// if their tag appears anywhere.
    pub fn matches(&self, path: &ScopePath) -> bool {
        let tags = path.tags();

        for section in self.sections.iter().filter(|s| s.negate) {
            if tags.iter().any(|t| section.tag_eq(t)) {
                return false;
            }
        }

        let mut pos = 0;
        for section in self.sections.iter().filter(|s| !s.negate) {
            match tags[pos..].iter().position(|t| section.tag_eq(t)) {
                Some(found) => pos += found + 1,
                None => return false,
            }
        }
        true
    }
}

impl Section {
    fn tag_eq(&self, tag: &str) -> bool {
        if self.wildcard {
            return true;
        }
        if self.nocase {
            self.tag.eq_ignore_ascii_case(tag)
        } else {
            self.tag == tag
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::parse("text")
    }
}
