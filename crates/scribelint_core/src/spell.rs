//! Hunspell-compatible dictionary lookup.
//!
//! Reads a `.dic` word list plus the `.aff` affix rules it references,
//! expands single-fold prefixes and suffixes, and answers membership and
//! suggestion queries. Suggestions come from a bounded edit-distance scan
//! over the expanded word list.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::LintError;

/// One rewrite rule inside an affix class.
#[derive(Debug, Clone)]
struct AffixRule {
    strip: String,
    add: String,
    condition: Condition,
}

/// A parsed affix condition: a sequence of literal chars or bracketed char
/// classes (possibly negated), matched against the end (SFX) or start
/// (PFX) of a word.
#[derive(Debug, Clone)]
struct Condition {
    atoms: Vec<CondAtom>,
}

#[derive(Debug, Clone)]
enum CondAtom {
    Any,
    Literal(char),
    Class { negated: bool, chars: Vec<char> },
}

impl Condition {
    fn parse(s: &str) -> Self {
        let mut atoms = Vec::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '.' => atoms.push(CondAtom::Any),
                '[' => {
                    let mut negated = false;
                    let mut set = Vec::new();
                    if chars.peek() == Some(&'^') {
                        negated = true;
                        chars.next();
                    }
                    for inner in chars.by_ref() {
                        if inner == ']' {
                            break;
                        }
                        set.push(inner);
                    }
                    atoms.push(CondAtom::Class {
                        negated,
                        chars: set,
                    });
                }
                other => atoms.push(CondAtom::Literal(other)),
            }
        }
        Self { atoms }
    }

    fn matches_end(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < self.atoms.len() {
            return false;
        }
        let tail = &chars[chars.len() - self.atoms.len()..];
        self.atoms.iter().zip(tail).all(|(a, c)| a.matches(*c))
    }

    fn matches_start(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < self.atoms.len() {
            return false;
        }
        self.atoms.iter().zip(&chars).all(|(a, c)| a.matches(*c))
    }
}

impl CondAtom {
    fn matches(&self, c: char) -> bool {
        match self {
            CondAtom::Any => true,
            CondAtom::Literal(l) => *l == c,
            CondAtom::Class { negated, chars } => chars.contains(&c) != *negated,
        }
    }
}

#[derive(Debug, Clone)]
struct AffixClass {
    is_suffix: bool,
    rules: Vec<AffixRule>,
}

/// A loaded dictionary.
#[derive(Debug)]
pub struct Dictionary {
    /// Expanded word forms, case preserved, in insertion order.
    words: Vec<String>,
    /// Lowercased membership index.
    index: HashSet<String>,
}

impl Dictionary {
    /// Loads a dictionary from an `.aff`/`.dic` pair.
    pub fn load(aff_path: &Path, dic_path: &Path) -> Result<Self, LintError> {
        let aff = fs::read_to_string(aff_path).map_err(|e| LintError::Dictionary {
            path: aff_path.to_path_buf(),
            message: e.to_string(),
        })?;
        let dic = fs::read_to_string(dic_path).map_err(|e| LintError::Dictionary {
            path: dic_path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::parse(&aff, &dic))
    }

    /// Parses dictionary content directly.
    pub fn parse(aff: &str, dic: &str) -> Self {
        let classes = parse_aff(aff);
        let mut dict = Dictionary {
            words: Vec::new(),
            index: HashSet::new(),
        };

        let mut lines = dic.lines().peekable();
        // First line is the approximate entry count; skip it when numeric.
        if let Some(line) = lines.peek() {
            if line.trim().parse::<usize>().is_ok() {
                lines.next();
            }
        }
        for line in lines {
            dict.add_entry(line, &classes);
        }
        dict
    }

    fn add_entry(&mut self, line: &str, classes: &HashMap<char, AffixClass>) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        let (word, flags) = match line.split_once('/') {
            Some((w, f)) => (w, f),
            None => (line, ""),
        };
        let word = word.trim();
        if word.is_empty() {
            return;
        }
        self.push_word(word.to_string());

        for flag in flags.chars() {
            if let Some(class) = classes.get(&flag) {
                for rule in &class.rules {
                    if let Some(form) = apply_rule(word, rule, class.is_suffix) {
                        self.push_word(form);
                    }
                }
            }
        }
    }

    fn push_word(&mut self, word: String) {
        if self.index.insert(word.to_lowercase()) {
            self.words.push(word);
        }
    }

    /// Returns true for an empty dictionary, which disables lookups.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Checks whether a word is known.
    ///
    /// A word matches if it appears as-is (case-folded), or if it is a
    /// capitalized form of a known lowercase word.
    pub fn check(&self, word: &str) -> bool {
        self.index.contains(&word.to_lowercase())
    }

    /// Suggests up to `limit` corrections for an unknown word, ranked by
    /// edit distance then dictionary order.
    pub fn suggest(&self, word: &str, limit: usize) -> Vec<String> {
        let target = word.to_lowercase();
        let target_len = target.chars().count();
        let mut candidates: Vec<(usize, usize, &String)> = Vec::new();

        for (order, candidate) in self.words.iter().enumerate() {
            let cand_len = candidate.chars().count();
            if cand_len.abs_diff(target_len) > 2 {
                continue;
            }
            if let Some(dist) = bounded_edit_distance(&target, &candidate.to_lowercase(), 2) {
                if dist > 0 {
                    candidates.push((dist, order, candidate));
                }
            }
        }

        candidates.sort();
        candidates
            .into_iter()
            .take(limit)
            .map(|(_, _, w)| w.clone())
            .collect()
    }
}

fn parse_aff(aff: &str) -> HashMap<char, AffixClass> {
    let mut classes: HashMap<char, AffixClass> = HashMap::new();

    for line in aff.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let is_suffix = match fields[0] {
            "SFX" => true,
            "PFX" => false,
            _ => continue,
        };
        let flag = match fields[1].chars().next() {
            Some(f) => f,
            None => continue,
        };

        // Header lines are `SFX flag cross_product count`; rule lines are
        // `SFX flag strip add condition`.
        if fields[2] == "Y" || fields[2] == "N" {
            classes.entry(flag).or_insert(AffixClass {
                is_suffix,
                rules: Vec::new(),
            });
            continue;
        }

        let strip = if fields[2] == "0" { "" } else { fields[2] };
        let add = if fields[3] == "0" { "" } else { fields[3] };
        // Strip continuation flags from the add field ("ers/X").
        let add = add.split('/').next().unwrap_or(add);
        let condition = fields.get(4).copied().unwrap_or(".");

        classes
            .entry(flag)
            .or_insert(AffixClass {
                is_suffix,
                rules: Vec::new(),
            })
            .rules
            .push(AffixRule {
                strip: strip.to_string(),
                add: add.to_string(),
                condition: Condition::parse(condition),
            });
    }

    classes
}

fn apply_rule(word: &str, rule: &AffixRule, is_suffix: bool) -> Option<String> {
    if is_suffix {
        if !rule.condition.matches_end(word) {
            return None;
        }
        let stem = word.strip_suffix(rule.strip.as_str())?;
        Some(format!("{}{}", stem, rule.add))
    } else {
        if !rule.condition.matches_start(word) {
            return None;
        }
        let stem = word.strip_prefix(rule.strip.as_str())?;
        Some(format!("{}{}", rule.add, stem))
    }
}

/// Levenshtein distance, bailing out with `None` once it exceeds `max`.
fn bounded_edit_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        let mut row_min = curr[0];
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            row_min = row_min.min(curr[j]);
        }
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let dist = prev[b.len()];
    (dist <= max).then_some(dist)
}
