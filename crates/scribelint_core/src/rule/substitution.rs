//! `substitution`: matches the keys of `swap` and suggests the values.

use regex::Regex;
use scribelint_text::TaggedToken;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, with_flags, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["ignorecase", "nonword", "pos", "swap"];

/// Decoded `substitution` body.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub ignorecase: bool,
    pub nonword: bool,
    /// `observed: expected` pairs, definition order preserved.
    pub swap: Vec<(String, String)>,
    pub pos: Option<String>,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Substitution, ConfigError> {
    let body = Substitution {
        ignorecase: map.bool("ignorecase")?,
        nonword: map.bool("nonword")?,
        swap: map.pairs("swap")?,
        pos: map.str("pos")?,
    };
    if body.swap.is_empty() {
        return Err(map.err("swap", "substitution requires a non-empty 'swap' map"));
    }
    Ok(body)
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    re: Regex,
    /// Keys with their replacements, longest key first so overlapping keys
    /// resolve to the longest match; anchored per-key patterns identify
    /// which key a match came from.
    lookup: Vec<(Regex, String)>,
    pos: Option<Regex>,
    needs_tags: bool,
}

impl Check {
    pub fn compile(map: &RuleMap<'_>, body: &Substitution) -> Result<Self, ConfigError> {
        // Longest key wins; equal lengths keep definition order (sort is
        // stable).
        let mut ordered: Vec<&(String, String)> = body.swap.iter().collect();
        ordered.sort_by_key(|(k, _)| std::cmp::Reverse(k.len()));

        let keys: Vec<String> = ordered.iter().map(|(k, _)| k.clone()).collect();
        let joined = keys.join("|");
        let pattern = if body.nonword {
            format!("(?:{joined})")
        } else {
            format!("\\b(?:{joined})\\b")
        };
        let re = compile_regex(map, "swap", &with_flags(body.ignorecase, pattern))?;

        let mut lookup = Vec::with_capacity(ordered.len());
        for (key, value) in ordered {
            let anchored = with_flags(body.ignorecase, format!("^(?:{key})$"));
            lookup.push((compile_regex(map, "swap", &anchored)?, value.clone()));
        }

        let pos = match &body.pos {
            Some(p) => Some(compile_regex(map, "pos", p)?),
            None => None,
        };

        Ok(Self {
            needs_tags: pos.is_some(),
            re,
            lookup,
            pos,
        })
    }

    /// True when this rule needs POS tags for the block.
    pub fn needs_tags(&self) -> bool {
        self.needs_tags
    }

    pub fn check(&self, text: &str, tags: &[TaggedToken]) -> Vec<MatchOut> {
        let mut out = Vec::new();
        for m in self.re.find_iter(text) {
            if let Some(pos_re) = &self.pos {
                let tag = tags
                    .iter()
                    .find(|t| t.span.start <= m.start() && m.start() < t.span.end)
                    .map(|t| t.tag.as_str())
                    .unwrap_or("");
                if !pos_re.is_match(tag) {
                    continue;
                }
            }

            let observed = m.as_str();
            let Some(expected) = self
                .lookup
                .iter()
                .find(|(key_re, _)| key_re.is_match(observed))
                .map(|(_, v)| v.clone())
            else {
                continue;
            };

            // An empty replacement means "just flag it".
            let args = vec![expected.clone(), observed.to_string()];
            let suggestions = if expected.is_empty() {
                Vec::new()
            } else {
                vec![expected]
            };
            out.push(
                MatchOut::new(m.start(), m.end(), observed)
                    .with_args(args)
                    .with_suggestions(suggestions),
            );
        }
        out
    }
}
