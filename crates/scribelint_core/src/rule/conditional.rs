//! `conditional`: every match of `first` must be justified by some match
//! of `second` elsewhere in the document.

use std::collections::HashSet;

use regex::Regex;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, exception_pattern, with_flags, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["exceptions", "first", "ignorecase", "second"];

/// Decoded `conditional` body.
#[derive(Debug, Clone)]
pub struct Conditional {
    pub ignorecase: bool,
    pub first: String,
    pub second: String,
    pub exceptions: Vec<String>,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Conditional, ConfigError> {
    Ok(Conditional {
        ignorecase: map.bool("ignorecase")?,
        first: map.required_str("first")?,
        second: map.required_str("second")?,
        exceptions: map.str_list("exceptions")?,
    })
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    first: Regex,
    second: Regex,
    exceptions: Option<Regex>,
}

impl Check {
    /// `accepted` is the session's AcceptedTokens, appended to the rule's
    /// own exceptions at compile time.
    pub fn compile(
        map: &RuleMap<'_>,
        body: &Conditional,
        accepted: &[String],
    ) -> Result<Self, ConfigError> {
        let mut exceptions = body.exceptions.clone();
        exceptions.extend(accepted.iter().cloned());

        Ok(Self {
            first: compile_regex(map, "first", &with_flags(body.ignorecase, body.first.clone()))?,
            second: compile_regex(
                map,
                "second",
                &with_flags(body.ignorecase, body.second.clone()),
            )?,
            exceptions: exception_pattern(map, "exceptions", &exceptions, true)?,
        })
    }

    /// First pass: collect every `second` match in the block into the
    /// document-wide set. Capture group 1, when present, names the
    /// justified antecedent.
    pub fn collect(&self, text: &str, seconds: &mut HashSet<String>) {
        for caps in self.second.captures_iter(text) {
            let m = caps.get(1).or_else(|| caps.get(0)).expect("group 0");
            seconds.insert(m.as_str().to_string());
        }
    }

    /// Second pass: flag `first` matches whose antecedent (capture group 1
    /// when present, else the whole match) never appeared as a `second`.
    pub fn check(&self, text: &str, seconds: &HashSet<String>) -> Vec<MatchOut> {
        let mut out = Vec::new();
        for caps in self.first.captures_iter(text) {
            let whole = caps.get(0).expect("group 0 always present");
            let antecedent = caps.get(1).unwrap_or(whole).as_str();

            if seconds.contains(antecedent) {
                continue;
            }
            if self
                .exceptions
                .as_ref()
                .is_some_and(|re| re.is_match(antecedent))
            {
                continue;
            }
            out.push(MatchOut::new(whole.start(), whole.end(), whole.as_str()));
        }
        out
    }
}
