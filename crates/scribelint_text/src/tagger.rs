//! A lexicon + suffix-heuristic part-of-speech tagger.
//!
//! Emits Penn Treebank tags. Accuracy is deliberately modest: rules that
//! consume tags (`sequence`, `substitution` with `pos`) match tag *patterns*,
//! so a closed-class lexicon plus suffix heuristics covers the constructions
//! style rules actually target.

use std::collections::HashMap;
use std::ops::Range;

use crate::tokenizer::Tokenizer;

/// A token with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    /// The surface text of the token.
    pub text: String,
    /// Byte range in the original text.
    pub span: Range<usize>,
    /// Penn Treebank tag (`NN`, `VB`, `MD`, ...); punctuation tags as
    /// itself.
    pub tag: String,
}

const LEXICON: &[(&str, &str)] = &[
    ("a", "DT"),
    ("about", "IN"),
    ("after", "IN"),
    ("against", "IN"),
    ("all", "DT"),
    ("am", "VBP"),
    ("among", "IN"),
    ("an", "DT"),
    ("and", "CC"),
    ("any", "DT"),
    ("are", "VBP"),
    ("as", "IN"),
    ("at", "IN"),
    ("be", "VB"),
    ("because", "IN"),
    ("been", "VBN"),
    ("before", "IN"),
    ("being", "VBG"),
    ("best", "JJS"),
    ("better", "JJR"),
    ("between", "IN"),
    ("both", "DT"),
    ("but", "CC"),
    ("by", "IN"),
    ("can", "MD"),
    ("could", "MD"),
    ("did", "VBD"),
    ("do", "VBP"),
    ("does", "VBZ"),
    ("during", "IN"),
    ("each", "DT"),
    ("every", "DT"),
    ("few", "JJ"),
    ("for", "IN"),
    ("from", "IN"),
    ("had", "VBD"),
    ("has", "VBZ"),
    ("have", "VBP"),
    ("he", "PRP"),
    ("her", "PRP$"),
    ("him", "PRP"),
    ("his", "PRP$"),
    ("how", "WRB"),
    ("i", "PRP"),
    ("if", "IN"),
    ("in", "IN"),
    ("into", "IN"),
    ("is", "VBZ"),
    ("it", "PRP"),
    ("its", "PRP$"),
    ("may", "MD"),
    ("me", "PRP"),
    ("might", "MD"),
    ("more", "JJR"),
    ("most", "JJS"),
    ("much", "JJ"),
    ("must", "MD"),
    ("my", "PRP$"),
    ("no", "DT"),
    ("nor", "CC"),
    ("not", "RB"),
    ("of", "IN"),
    ("on", "IN"),
    ("or", "CC"),
    ("our", "PRP$"),
    ("over", "IN"),
    ("shall", "MD"),
    ("she", "PRP"),
    ("should", "MD"),
    ("so", "RB"),
    ("some", "DT"),
    ("such", "JJ"),
    ("than", "IN"),
    ("that", "DT"),
    ("the", "DT"),
    ("their", "PRP$"),
    ("them", "PRP"),
    ("there", "EX"),
    ("these", "DT"),
    ("they", "PRP"),
    ("this", "DT"),
    ("those", "DT"),
    ("through", "IN"),
    ("to", "TO"),
    ("too", "RB"),
    ("under", "IN"),
    ("upon", "IN"),
    ("us", "PRP"),
    ("very", "RB"),
    ("was", "VBD"),
    ("we", "PRP"),
    ("were", "VBD"),
    ("what", "WP"),
    ("when", "WRB"),
    ("where", "WRB"),
    ("which", "WDT"),
    ("while", "IN"),
    ("who", "WP"),
    ("whom", "WP"),
    ("whose", "WP$"),
    ("why", "WRB"),
    ("will", "MD"),
    ("with", "IN"),
    ("within", "IN"),
    ("without", "IN"),
    ("would", "MD"),
    ("you", "PRP"),
    ("your", "PRP$"),
];

/// Part-of-speech tagger.
pub struct Tagger {
    lexicon: HashMap<&'static str, &'static str>,
    tokenizer: Tokenizer,
}

impl Tagger {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            tokenizer: Tokenizer::new(),
        }
    }

    /// Tokenizes and tags the given text.
    pub fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let tokens = self.tokenizer.tokenize(text);
        let mut tagged = Vec::with_capacity(tokens.len());
        let mut sentence_start = true;

        for token in tokens {
            let is_word = token.text.chars().any(char::is_alphanumeric);
            let tag = if is_word {
                self.tag_word(&token.text, sentence_start)
            } else {
                token.text.clone()
            };

            if is_word {
                sentence_start = false;
            } else if matches!(token.text.as_str(), "." | "!" | "?") {
                sentence_start = true;
            }

            tagged.push(TaggedToken {
                text: token.text,
                span: token.span,
                tag,
            });
        }

        tagged
    }

    fn tag_word(&self, word: &str, sentence_start: bool) -> String {
        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(lower.as_str()) {
            return (*tag).to_string();
        }

        if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return "CD".to_string();
        }

        // Mid-sentence capitalization marks a proper noun.
        if !sentence_start && word.chars().next().is_some_and(char::is_uppercase) {
            return "NNP".to_string();
        }

        let tag = if lower.ends_with("ly") {
            "RB"
        } else if lower.ends_with("ing") && lower.len() > 4 {
            "VBG"
        } else if lower.ends_with("ed") && lower.len() > 3 {
            "VBD"
        } else if lower.ends_with("able")
            || lower.ends_with("ible")
            || lower.ends_with("ful")
            || lower.ends_with("ous")
            || lower.ends_with("ive")
            || lower.ends_with("ic")
            || lower.ends_with("less")
        {
            "JJ"
        } else if lower.ends_with("tion")
            || lower.ends_with("ment")
            || lower.ends_with("ness")
            || lower.ends_with("ity")
            || lower.ends_with("ance")
            || lower.ends_with("ence")
        {
            "NN"
        } else if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
            "NNS"
        } else {
            "NN"
        };
        tag.to_string()
    }
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<(String, String)> {
        Tagger::new()
            .tag(text)
            .into_iter()
            .map(|t| (t.text, t.tag))
            .collect()
    }

    #[test]
    fn test_closed_class() {
        let tagged = tags("the cat could run");
        assert_eq!(tagged[0].1, "DT");
        assert_eq!(tagged[2].1, "MD");
    }

    #[test]
    fn test_adverb_suffix() {
        let tagged = tags("move quickly");
        assert_eq!(tagged[1].1, "RB");
    }

    #[test]
    fn test_gerund_suffix() {
        let tagged = tags("keep running");
        assert_eq!(tagged[1].1, "VBG");
    }

    #[test]
    fn test_proper_noun_mid_sentence() {
        let tagged = tags("ask Alice tomorrow");
        assert_eq!(tagged[1].1, "NNP");
    }

    #[test]
    fn test_sentence_start_not_proper() {
        let tagged = tags("Tomorrow is fine");
        assert_ne!(tagged[0].1, "NNP");
    }

    #[test]
    fn test_number() {
        let tagged = tags("chapter 12");
        assert_eq!(tagged[1].1, "CD");
    }

    #[test]
    fn test_plural_noun() {
        let tagged = tags("the reports");
        assert_eq!(tagged[1].1, "NNS");
    }

    #[test]
    fn test_punctuation_tagged_as_itself() {
        let tagged = tags("yes, no");
        assert_eq!(tagged[1].0, ",");
        assert_eq!(tagged[1].1, ",");
    }

    #[test]
    fn test_sentence_boundary_resets() {
        let tagged = tags("Stop. Alice left.");
        // "Alice" is sentence-initial, so capitalization alone does not mark
        // it NNP; it falls through to the suffix rules.
        assert_eq!(tagged[2].0, "Alice");
        assert_ne!(tagged[2].1, "NNP");
    }
}
