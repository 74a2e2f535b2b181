//! `spelling`: dictionary lookup over word-like tokens.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use scribelint_text::Tokenizer;

use crate::error::{ConfigError, LintError};
use crate::rule::compile::{compile_regex, MatchOut};
use crate::rule::yaml::RuleMap;
use crate::spell::Dictionary;

pub const KEYS: &[&str] = &[
    "aff",
    "custom",
    "dic",
    "exceptions",
    "filters",
    "ignore",
    "threshold",
];

const DEFAULT_THRESHOLD: usize = 3;

/// Decoded `spelling` body.
#[derive(Debug, Clone)]
pub struct Spelling {
    pub aff: String,
    pub dic: String,
    pub custom: bool,
    pub filters: Vec<String>,
    pub ignore: Vec<String>,
    pub exceptions: Vec<String>,
    pub threshold: usize,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Spelling, ConfigError> {
    Ok(Spelling {
        aff: map.required_str("aff")?,
        dic: map.required_str("dic")?,
        custom: map.bool("custom")?,
        filters: map.str_list("filters")?,
        ignore: map.str_or_list("ignore")?,
        exceptions: map.str_list("exceptions")?,
        threshold: map.usize("threshold")?.unwrap_or(DEFAULT_THRESHOLD),
    })
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    dict: Arc<Dictionary>,
    filters: Vec<Regex>,
    ignore: HashSet<String>,
    exceptions: HashSet<String>,
    custom: bool,
    threshold: usize,
    tokenizer: Tokenizer,
}

impl Check {
    /// Compiles the rule, loading the dictionary and ignore files relative
    /// to `styles_path`. Dictionary failures are runtime errors, not
    /// configuration errors.
    pub fn compile(
        map: &RuleMap<'_>,
        body: &Spelling,
        styles_path: &Path,
        accepted: &[String],
    ) -> Result<Self, LintError> {
        let dict = Dictionary::load(
            &resolve(styles_path, &body.aff),
            &resolve(styles_path, &body.dic),
        )?;

        let mut filters = Vec::with_capacity(body.filters.len());
        for f in &body.filters {
            filters.push(compile_regex(map, "filters", f)?);
        }

        let mut ignore = HashSet::new();
        for rel in &body.ignore {
            let path = resolve(styles_path, rel);
            let content = std::fs::read_to_string(&path).map_err(|e| {
                LintError::runtime(format!("cannot read ignore file {}: {e}", path.display()))
            })?;
            for line in content.lines() {
                let word = line.trim();
                if !word.is_empty() && !word.starts_with('#') {
                    ignore.insert(word.to_lowercase());
                }
            }
        }

        let exceptions = body
            .exceptions
            .iter()
            .chain(accepted.iter())
            .map(|s| s.to_lowercase())
            .collect();

        Ok(Self {
            dict: Arc::new(dict),
            filters,
            ignore,
            exceptions,
            custom: body.custom,
            threshold: body.threshold,
            tokenizer: Tokenizer::new(),
        })
    }

    pub fn check(&self, text: &str) -> Vec<MatchOut> {
        let mut out = Vec::new();

        for token in self.tokenizer.words(text) {
            let word = token.text.as_str();

            if !self.custom && default_filtered(word) {
                continue;
            }
            if self.filters.iter().any(|re| re.is_match(word)) {
                continue;
            }
            let lower = word.to_lowercase();
            if self.ignore.contains(&lower) || self.exceptions.contains(&lower) {
                continue;
            }
            if self.dict.check(word) {
                continue;
            }

            let suggestions = self.dict.suggest(word, self.threshold);
            out.push(
                MatchOut::new(token.span.start, token.span.end, word)
                    .with_suggestions(suggestions),
            );
        }

        out
    }
}

/// The default filters: acronyms (all-caps, two or more letters), numbers,
/// and mixed alphanumerics.
fn default_filtered(word: &str) -> bool {
    let chars: Vec<char> = word.chars().filter(|c| c.is_alphanumeric()).collect();
    if chars.is_empty() {
        return true;
    }
    if chars.iter().any(|c| c.is_ascii_digit()) {
        return true;
    }
    chars.len() >= 2 && chars.iter().all(|c| c.is_uppercase())
}

fn resolve(styles_path: &Path, rel: &str) -> std::path::PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        styles_path.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const DIC: &str = "4\nthe\ncat\nsat\nmat\n";

    fn setup(extra_yaml: &str, accepted: &[&str]) -> (Check, tempfile::TempDir) {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("en.dic"), DIC).unwrap();
        fs::write(temp.path().join("en.aff"), "SET UTF-8\n").unwrap();
        fs::write(temp.path().join("extra.txt"), "scribelint\n").unwrap();

        let yaml = format!("aff: en.aff\ndic: en.dic\n{extra_yaml}");
        let mapping: Mapping = serde_yaml::from_str(&yaml).unwrap();
        let file = PathBuf::from("Test.yml");
        let map = RuleMap::new(&mapping, &file);
        let body = decode(&map).unwrap();
        let accepted: Vec<String> = accepted.iter().map(|s| s.to_string()).collect();
        let check = Check::compile(&map, &body, temp.path(), &accepted).unwrap();
        (check, temp)
    }

    #[test]
    fn test_unknown_word_flagged() {
        let (check, _t) = setup("", &[]);
        let matches = check.check("the cat zat");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, "zat");
    }

    #[test]
    fn test_suggestions_ranked() {
        let (check, _t) = setup("", &[]);
        let matches = check.check("the kat");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].suggestions.contains(&"cat".to_string()));
        assert!(matches[0].suggestions.len() <= 3);
    }

    #[test]
    fn test_threshold_limits_suggestions() {
        let (check, _t) = setup("threshold: 1\n", &[]);
        let matches = check.check("the kat");
        assert!(matches[0].suggestions.len() <= 1);
    }

    #[test]
    fn test_acronyms_skipped_by_default() {
        let (check, _t) = setup("", &[]);
        assert!(check.check("the HTTP cat").is_empty());
    }

    #[test]
    fn test_numbers_and_mixed_skipped() {
        let (check, _t) = setup("", &[]);
        assert!(check.check("the cat 42 sat 3rd").is_empty());
    }

    #[test]
    fn test_custom_disables_default_filters() {
        let (check, _t) = setup("custom: true\n", &[]);
        let matches = check.check("the HTTP cat");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, "HTTP");
    }

    #[test]
    fn test_user_filters() {
        let (check, _t) = setup("filters:\n  - '^z'\n", &[]);
        assert!(check.check("the cat zat").is_empty());
    }

    #[test]
    fn test_ignore_file() {
        let (check, _t) = setup("ignore: extra.txt\n", &[]);
        assert!(check.check("the scribelint cat").is_empty());
    }

    #[test]
    fn test_accepted_tokens() {
        let (check, _t) = setup("", &["Grafana"]);
        assert!(check.check("the grafana cat").is_empty());
    }

    #[test]
    fn test_missing_dictionary_is_runtime_error() {
        let temp = tempdir().unwrap();
        let mapping: Mapping = serde_yaml::from_str("aff: nope.aff\ndic: nope.dic\n").unwrap();
        let file = PathBuf::from("Test.yml");
        let map = RuleMap::new(&mapping, &file);
        let body = decode(&map).unwrap();
        let err = Check::compile(&map, &body, temp.path(), &[]).unwrap_err();
        assert!(matches!(err, LintError::Dictionary { .. }));
    }
}
