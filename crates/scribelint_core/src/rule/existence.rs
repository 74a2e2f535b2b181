//! `existence`: fires once per match of a token alternation.

use regex::Regex;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, token_group, with_flags, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["append", "ignorecase", "nonword", "raw", "tokens"];

/// Decoded `existence` body.
#[derive(Debug, Clone)]
pub struct Existence {
    pub append: bool,
    pub ignorecase: bool,
    pub nonword: bool,
    pub raw: Vec<String>,
    pub tokens: Vec<String>,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Existence, ConfigError> {
    let body = Existence {
        append: map.bool("append")?,
        ignorecase: map.bool("ignorecase")?,
        nonword: map.bool("nonword")?,
        raw: map.str_list("raw")?,
        tokens: map.str_list("tokens")?,
    };
    if body.raw.is_empty() && body.tokens.is_empty() {
        return Err(map.err("tokens", "existence requires 'tokens' or 'raw'"));
    }
    Ok(body)
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    re: Regex,
}

impl Check {
    pub fn compile(map: &RuleMap<'_>, body: &Existence) -> Result<Self, ConfigError> {
        // `raw` fragments are concatenated literally. With `append`, the
        // bounded token group follows them; otherwise the group comes
        // first.
        let raw = body.raw.concat();
        let group = if body.tokens.is_empty() {
            String::new()
        } else {
            token_group(&body.tokens, body.nonword)
        };
        let pattern = if body.append {
            format!("{raw}{group}")
        } else {
            format!("{group}{raw}")
        };
        let re = compile_regex(map, "tokens", &with_flags(body.ignorecase, pattern))?;
        Ok(Self { re })
    }

    pub fn check(&self, text: &str) -> Vec<MatchOut> {
        self.re
            .find_iter(text)
            .map(|m| MatchOut::new(m.start(), m.end(), m.as_str()))
            .collect()
    }
}
