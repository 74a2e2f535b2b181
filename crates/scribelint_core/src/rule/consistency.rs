//! `consistency`: once one side of a pair appears, the other side is
//! flagged for the rest of the document.

use std::collections::HashMap;

use regex::Regex;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, with_flags, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["either", "ignorecase", "nonword"];

/// Decoded `consistency` body.
#[derive(Debug, Clone)]
pub struct Consistency {
    pub nonword: bool,
    pub ignorecase: bool,
    /// Pairs sorted by key for deterministic evaluation order.
    pub either: Vec<(String, String)>,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Consistency, ConfigError> {
    let mut either = map.pairs("either")?;
    if either.is_empty() {
        return Err(map.err("either", "consistency requires a non-empty 'either' map"));
    }
    either.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Consistency {
        nonword: map.bool("nonword")?,
        ignorecase: map.bool("ignorecase")?,
        either,
    })
}

/// Which side of a pair was seen first in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    First,
    Second,
}

/// Per-document tracker; created fresh for every document.
#[derive(Debug, Default)]
pub struct Tracker {
    chosen: HashMap<usize, Side>,
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    pairs: Vec<(Regex, Regex)>,
}

impl Check {
    pub fn compile(map: &RuleMap<'_>, body: &Consistency) -> Result<Self, ConfigError> {
        let mut pairs = Vec::with_capacity(body.either.len());
        for (a, b) in &body.either {
            pairs.push((
                compile_side(map, a, body.nonword, body.ignorecase)?,
                compile_side(map, b, body.nonword, body.ignorecase)?,
            ));
        }
        Ok(Self { pairs })
    }

    /// Checks one block, updating the document tracker.
    ///
    /// The first side of a pair seen in the document wins; matches of the
    /// losing side from then on (including later in the same block) are
    /// flagged.
    pub fn check(&self, text: &str, tracker: &mut Tracker) -> Vec<MatchOut> {
        let mut out = Vec::new();

        for (idx, (re_a, re_b)) in self.pairs.iter().enumerate() {
            let mut matches: Vec<(usize, usize, Side)> = re_a
                .find_iter(text)
                .map(|m| (m.start(), m.end(), Side::First))
                .chain(
                    re_b.find_iter(text)
                        .map(|m| (m.start(), m.end(), Side::Second)),
                )
                .collect();
            matches.sort_by_key(|&(start, _, _)| start);

            for (start, end, side) in matches {
                match tracker.chosen.get(&idx) {
                    None => {
                        tracker.chosen.insert(idx, side);
                    }
                    Some(&chosen) if chosen != side => {
                        out.push(MatchOut::new(start, end, &text[start..end]));
                    }
                    Some(_) => {}
                }
            }
        }

        out
    }
}

fn compile_side(
    map: &RuleMap<'_>,
    side: &str,
    nonword: bool,
    ignorecase: bool,
) -> Result<Regex, ConfigError> {
    let pattern = if nonword {
        format!("(?:{side})")
    } else {
        format!("\\b(?:{side})\\b")
    };
    compile_regex(map, "either", &with_flags(ignorecase, pattern))
}
