//! `capitalization`: checks the case convention of a block.

use regex::Regex;
use scribelint_text::Tokenizer;

use crate::error::ConfigError;
use crate::rule::compile::{compile_regex, MatchOut};
use crate::rule::yaml::RuleMap;

pub const KEYS: &[&str] = &["exceptions", "indicators", "match", "style"];

/// Small words left lowercase in AP title case.
const AP_SMALL: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "nor", "of", "on", "or",
    "per", "so", "the", "to", "up", "v", "via", "vs", "yet",
];

/// Chicago lowercases all prepositions regardless of length.
const CHICAGO_SMALL: &[&str] = &[
    "a", "about", "above", "across", "after", "against", "along", "among", "an", "and", "around",
    "as", "at", "before", "behind", "below", "beneath", "beside", "between", "beyond", "but", "by",
    "down", "during", "en", "for", "from", "if", "in", "inside", "into", "like", "near", "nor",
    "of", "off", "on", "onto", "or", "outside", "over", "past", "per", "since", "so", "the",
    "through", "throughout", "to", "toward", "under", "until", "up", "upon", "v", "via", "vs",
    "with", "within", "without", "yet",
];

/// Decoded `capitalization` body.
#[derive(Debug, Clone)]
pub struct Capitalization {
    pub r#match: String,
    pub style: Option<String>,
    pub exceptions: Vec<String>,
    pub indicators: Vec<String>,
}

pub fn decode(map: &RuleMap<'_>) -> Result<Capitalization, ConfigError> {
    Ok(Capitalization {
        r#match: map.required_str("match")?,
        style: map.str("style")?,
        exceptions: map.str_list("exceptions")?,
        indicators: map.str_list("indicators")?,
    })
}

#[derive(Debug)]
enum Mode {
    Title { small: &'static [&'static str] },
    Sentence,
    Lower,
    Upper,
    Pattern(Regex),
}

/// Compiled matcher.
#[derive(Debug)]
pub struct Check {
    mode: Mode,
    exceptions: Vec<String>,
    indicators: Vec<String>,
    tokenizer: Tokenizer,
}

impl Check {
    pub fn compile(
        map: &RuleMap<'_>,
        body: &Capitalization,
        accepted: &[String],
    ) -> Result<Self, ConfigError> {
        let mode = match body.r#match.as_str() {
            "$title" => {
                let small = match body.style.as_deref() {
                    Some("Chicago") => CHICAGO_SMALL,
                    _ => AP_SMALL,
                };
                Mode::Title { small }
            }
            "$sentence" => Mode::Sentence,
            "$lower" => Mode::Lower,
            "$upper" => Mode::Upper,
            pattern => Mode::Pattern(compile_regex(map, "match", pattern)?),
        };

        let mut exceptions = body.exceptions.clone();
        exceptions.extend(accepted.iter().cloned());

        Ok(Self {
            mode,
            exceptions,
            indicators: body.indicators.clone(),
            tokenizer: Tokenizer::new(),
        })
    }

    pub fn check(&self, text: &str) -> Vec<MatchOut> {
        let words = self.tokenizer.words(text);
        if words.is_empty() {
            return Vec::new();
        }

        let offenders: Vec<usize> = match &self.mode {
            Mode::Sentence => {
                let first = &words[0];
                if starts_upper(&first.text) || self.is_exempt(&first.text) {
                    Vec::new()
                } else {
                    vec![0]
                }
            }
            Mode::Lower => words
                .iter()
                .enumerate()
                .filter(|(_, w)| {
                    w.text.chars().any(char::is_uppercase) && !self.is_exempt(&w.text)
                })
                .map(|(i, _)| i)
                .take(1)
                .collect(),
            Mode::Upper => words
                .iter()
                .enumerate()
                .filter(|(_, w)| {
                    w.text.chars().any(char::is_lowercase) && !self.is_exempt(&w.text)
                })
                .map(|(i, _)| i)
                .take(1)
                .collect(),
            Mode::Title { small } => {
                let last = words.len() - 1;
                words
                    .iter()
                    .enumerate()
                    .filter(|(i, w)| {
                        let lower = w.text.to_lowercase();
                        // First and last words are always significant.
                        let significant = *i == 0 || *i == last || !small.contains(&lower.as_str());
                        significant
                            && !starts_upper(&w.text)
                            && !self.is_exempt(&w.text)
                            && !self.follows_indicator(&words, *i)
                            && w.text.chars().next().is_some_and(char::is_alphabetic)
                    })
                    .map(|(i, _)| i)
                    .collect()
            }
            Mode::Pattern(re) => {
                if re.is_match(text) {
                    Vec::new()
                } else {
                    vec![0]
                }
            }
        };

        offenders
            .into_iter()
            .map(|i| {
                let w = &words[i];
                MatchOut::new(w.span.start, w.span.end, w.text.clone())
            })
            .collect()
    }

    fn is_exempt(&self, word: &str) -> bool {
        self.exceptions.iter().any(|e| e == word)
    }

    /// Indicators name suffixes ("vs.", "etc.") after which the next token
    /// is exempt. The tokenizer drops the trailing period, so compare
    /// against the indicator with punctuation stripped too.
    fn follows_indicator(&self, words: &[scribelint_text::Token], idx: usize) -> bool {
        if idx == 0 {
            return false;
        }
        let prev = &words[idx - 1].text;
        self.indicators
            .iter()
            .any(|ind| ind.trim_end_matches('.') == prev)
    }
}

fn starts_upper(word: &str) -> bool {
    word.chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase)
}
