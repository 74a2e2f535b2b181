//! `repetition`: flags the same token appearing too many times in a row.

use regex::Regex;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, token_group, with_flags, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["alpha", "ignorecase", "max", "tokens"];

/// Decoded `repetition` body.
#[derive(Debug, Clone)]
pub struct Repetition {
    pub max: usize,
    pub ignorecase: bool,
    pub alpha: bool,
    pub tokens: Vec<String>,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Repetition, ConfigError> {
    let body = Repetition {
        max: map.usize("max")?.unwrap_or(1),
        ignorecase: map.bool("ignorecase")?,
        alpha: map.bool("alpha")?,
        tokens: map.str_list("tokens")?,
    };
    if body.tokens.is_empty() {
        return Err(map.err("tokens", "repetition requires 'tokens'"));
    }
    Ok(body)
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    re: Regex,
    max: usize,
    ignorecase: bool,
    alpha: bool,
}

impl Check {
    pub fn compile(map: &RuleMap<'_>, body: &Repetition) -> Result<Self, ConfigError> {
        let pattern = with_flags(body.ignorecase, token_group(&body.tokens, true));
        Ok(Self {
            re: compile_regex(map, "tokens", &pattern)?,
            max: body.max,
            ignorecase: body.ignorecase,
            alpha: body.alpha,
        })
    }

    /// Scans matches in order, counting runs of equal tokens; the alert
    /// fires at the occurrence that first exceeds `max`, once per run.
    pub fn check(&self, text: &str) -> Vec<MatchOut> {
        let mut out = Vec::new();
        let mut run_token: Option<String> = None;
        let mut run_count = 0usize;
        let mut fired = false;

        for m in self.re.find_iter(text) {
            if self.alpha && !m.as_str().chars().all(char::is_alphanumeric) {
                run_token = None;
                run_count = 0;
                fired = false;
                continue;
            }

            let token = if self.ignorecase {
                m.as_str().to_lowercase()
            } else {
                m.as_str().to_string()
            };

            if run_token.as_deref() == Some(token.as_str()) {
                run_count += 1;
            } else {
                run_token = Some(token);
                run_count = 1;
                fired = false;
            }

            if run_count > self.max && !fired {
                out.push(MatchOut::new(m.start(), m.end(), m.as_str()));
                fired = true;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;
    use std::path::PathBuf;

    fn compile(yaml: &str) -> Check {
        let mapping: Mapping = serde_yaml::from_str(yaml).unwrap();
        let file = PathBuf::from("Test.yml");
        let map = RuleMap::new(&mapping, &file);
        let body = decode(&map).unwrap();
        Check::compile(&map, &body).unwrap()
    }

    #[test]
    fn test_doubled_word() {
        let check = compile("max: 1\ntokens:\n  - '[A-Za-z]+'\n");
        let matches = check.check("the the cat");
        assert_eq!(matches.len(), 1);
        // The alert lands on the second "the".
        assert_eq!(matches[0].span.start, 4);
        assert_eq!(matches[0].matched, "the");
    }

    #[test]
    fn test_no_repetition() {
        let check = compile("max: 1\ntokens:\n  - '[A-Za-z]+'\n");
        assert!(check.check("the cat sat").is_empty());
    }

    #[test]
    fn test_fires_once_per_run() {
        let check = compile("max: 1\ntokens:\n  - '[A-Za-z]+'\n");
        let matches = check.check("no no no yes yes");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_max_two_tolerates_doubles() {
        let check = compile("max: 2\ntokens:\n  - '[A-Za-z]+'\n");
        assert!(check.check("very very good").is_empty());
        assert_eq!(check.check("very very very good").len(), 1);
    }

    #[test]
    fn test_ignorecase_folds_runs() {
        let check = compile("max: 1\nignorecase: true\ntokens:\n  - '[A-Za-z]+'\n");
        let matches = check.check("The the cat");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let check = compile("max: 1\ntokens:\n  - '[A-Za-z]+'\n");
        assert!(check.check("The the cat").is_empty());
    }

    #[test]
    fn test_requires_tokens() {
        let mapping: Mapping = serde_yaml::from_str("max: 1\n").unwrap();
        let file = PathBuf::from("Test.yml");
        let map = RuleMap::new(&mapping, &file);
        assert!(decode(&map).is_err());
    }
}
