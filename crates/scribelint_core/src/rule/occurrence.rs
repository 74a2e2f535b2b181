//! `occurrence`: bounds how often a token may appear in a block.

use regex::Regex;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, with_flags, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["ignorecase", "max", "min", "token"];

/// Decoded `occurrence` body.
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub ignorecase: bool,
    pub max: Option<usize>,
    pub min: Option<usize>,
    pub token: String,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Occurrence, ConfigError> {
    let body = Occurrence {
        ignorecase: map.bool("ignorecase")?,
        max: map.usize("max")?,
        min: map.usize("min")?,
        token: map.required_str("token")?,
    };
    if body.max.is_none() && body.min.is_none() {
        return Err(map.err("max", "occurrence requires 'min' or 'max'"));
    }
    Ok(body)
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    re: Regex,
    min: Option<usize>,
    max: Option<usize>,
}

impl Check {
    pub fn compile(map: &RuleMap<'_>, body: &Occurrence) -> Result<Self, ConfigError> {
        let re = compile_regex(
            map,
            "token",
            &with_flags(body.ignorecase, body.token.clone()),
        )?;
        Ok(Self {
            re,
            min: body.min,
            max: body.max,
        })
    }

    /// Counts matches; one alert anchored at the first match when the count
    /// falls outside the configured bounds.
    pub fn check(&self, text: &str) -> Vec<MatchOut> {
        let mut first: Option<(usize, usize, String)> = None;
        let mut count = 0usize;
        for m in self.re.find_iter(text) {
            if first.is_none() {
                first = Some((m.start(), m.end(), m.as_str().to_string()));
            }
            count += 1;
        }

        let below = self.min.is_some_and(|min| count < min);
        let above = self.max.is_some_and(|max| count > max);
        if !below && !above {
            return Vec::new();
        }

        let (start, end, matched) = first.unwrap_or((0, 0, String::new()));
        vec![MatchOut::new(start, end, matched)]
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
    fn test_over_max_fires_once_at_first_match() {
        let check = compile("token: ','\nmax: 2\n");
        let matches = check.check("a, b, c, d");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span.start, 1);
    }

    #[test]
    fn test_within_bounds_is_quiet() {
        let check = compile("token: ','\nmax: 3\n");
        assert!(check.check("a, b, c").is_empty());
    }

    #[test]
    fn test_under_min_fires() {
        let check = compile("token: '\\bplease\\b'\nmin: 1\n");
        let matches = check.check("Do it now.");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].matched.is_empty());
    }

    #[test]
    fn test_min_satisfied() {
        let check = compile("token: '\\bplease\\b'\nmin: 1\n");
        assert!(check.check("Do it, please.").is_empty());
    }

    #[test]
    fn test_requires_min_or_max() {
        let mapping: Mapping = serde_yaml::from_str("token: x\n").unwrap();
        let file = PathBuf::from("Test.yml");
        let map = RuleMap::new(&mapping, &file);
        assert!(decode(&map).is_err());
    }
}
