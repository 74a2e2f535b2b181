//! `sequence`: matches an ordered pattern of tokens over the POS-tagged
//! block.

use regex::Regex;
use scribelint_text::TaggedToken;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, with_flags, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["ignorecase", "tokens"];

/// One unit of a sequence pattern.
#[derive(Debug, Clone, Default)]
pub struct NlpToken {
    /// Regex over the token's surface text.
    pub pattern: String,
    /// Regex over the token's POS tag.
    pub tag: String,
    /// Invert the match: the sequence fails if this unit matches.
    pub negate: bool,
    /// Up to this many arbitrary tokens may precede the unit's match.
    pub skip: usize,
}

/// Decoded `sequence` body.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub ignorecase: bool,
    pub tokens: Vec<NlpToken>,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Sequence, ConfigError> {
    let raw = map.map_list("tokens")?;
    if raw.is_empty() {
        return Err(map.err("tokens", "sequence requires 'tokens'"));
    }

    let mut tokens = Vec::with_capacity(raw.len());
    for unit in raw {
        let mut tok = NlpToken::default();
        for (key, value) in unit {
            let key = match key {
                serde_yaml::Value::String(s) => s.as_str(),
                _ => return Err(map.err("tokens", "token keys must be strings")),
            };
            match (key, value) {
                ("pattern", serde_yaml::Value::String(s)) => tok.pattern = s.clone(),
                ("tag", serde_yaml::Value::String(s)) => tok.tag = s.clone(),
                ("negate", serde_yaml::Value::Bool(b)) => tok.negate = *b,
                ("skip", serde_yaml::Value::Number(n)) => {
                    tok.skip = n.as_u64().unwrap_or(0) as usize;
                }
                (other, _) => {
                    return Err(map.err(other, format!("unknown sequence token key '{other}'")));
                }
            }
        }
        if tok.pattern.is_empty() && tok.tag.is_empty() {
            return Err(map.err("tokens", "each token needs a 'pattern' or a 'tag'"));
        }
        tokens.push(tok);
    }

    Ok(Sequence {
        ignorecase: map.bool("ignorecase")?,
        tokens,
    })
}

#[derive(Debug)]
struct Unit {
    pattern: Option<Regex>,
    tag: Option<Regex>,
    negate: bool,
    skip: usize,
}

impl Unit {
    fn accepts(&self, token: &TaggedToken) -> bool {
        let ok = self
            .pattern
            .as_ref()
            .map_or(true, |re| re.is_match(&token.text))
            && self.tag.as_ref().map_or(true, |re| re.is_match(&token.tag));
        if self.negate {
            !ok
        } else {
            ok
        }
    }
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    units: Vec<Unit>,
}

impl Check {
    pub fn compile(map: &RuleMap<'_>, body: &Sequence) -> Result<Self, ConfigError> {
        let mut units = Vec::with_capacity(body.tokens.len());
        for tok in &body.tokens {
            let pattern = if tok.pattern.is_empty() {
                None
            } else {
                let p = with_flags(body.ignorecase, format!("^(?:{})$", tok.pattern));
                Some(compile_regex(map, "pattern", &p)?)
            };
            let tag = if tok.tag.is_empty() {
                None
            } else {
                Some(compile_regex(map, "tag", &format!("^(?:{})$", tok.tag))?)
            };
            units.push(Unit {
                pattern,
                tag,
                negate: tok.negate,
                skip: tok.skip,
            });
        }
        Ok(Self { units })
    }

    /// Advances through the tagged tokens looking for the full sequence;
    /// each match fires one alert spanning it, and scanning resumes after
    /// the match.
    pub fn check(&self, text: &str, tokens: &[TaggedToken]) -> Vec<MatchOut> {
        let mut out = Vec::new();
        let mut start = 0;

        while start < tokens.len() {
            match self.try_match(tokens, start) {
                Some(end) => {
                    let span_start = tokens[start].span.start;
                    let span_end = tokens[end - 1].span.end;
                    out.push(MatchOut::new(
                        span_start,
                        span_end,
                        &text[span_start..span_end],
                    ));
                    start = end;
                }
                None => start += 1,
            }
        }

        out
    }

    /// Attempts a match anchored at `start`; returns the exclusive end
    /// index of the consumed tokens.
    fn try_match(&self, tokens: &[TaggedToken], start: usize) -> Option<usize> {
        let mut pos = start;
        for (i, unit) in self.units.iter().enumerate() {
            // The first unit anchors the match; later units may let up to
            // `skip` tokens intervene.
            let slack = if i == 0 { 0 } else { unit.skip };
            let mut matched = false;
            for offset in 0..=slack {
                let idx = pos + offset;
                if idx >= tokens.len() {
                    break;
                }
                if unit.accepts(&tokens[idx]) {
                    pos = idx + 1;
                    matched = true;
                    break;
                }
            }
            if !matched {
                return None;
            }
        }
        Some(pos)
    }
}
