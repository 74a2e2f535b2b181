//! Document statistics and readability formulas.

use crate::splitter::SentenceSplitter;
use crate::syllables;
use crate::tokenizer::Tokenizer;

/// Counts extracted from a document's prose, the inputs to every
/// readability formula.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextStats {
    /// Number of sentences.
    pub sentences: usize,
    /// Number of word tokens.
    pub words: usize,
    /// Number of letters and digits inside words.
    pub characters: usize,
    /// Total syllables across all words.
    pub syllables: usize,
    /// Words with three or more syllables, proper nouns excluded.
    pub complex_words: usize,
    /// Words with three or more syllables, proper nouns included.
    pub polysyllables: usize,
}

impl TextStats {
    /// Computes statistics over the given prose.
    pub fn compute(text: &str) -> Self {
        let sentences = SentenceSplitter::split(text, &[]).len();
        let tokenizer = Tokenizer::new();

        let mut stats = TextStats {
            sentences,
            ..Default::default()
        };

        for word in tokenizer.words(text) {
            let syl = syllables::count(&word.text);
            stats.words += 1;
            stats.characters += word.text.chars().filter(|c| c.is_alphanumeric()).count();
            stats.syllables += syl;
            if syl >= 3 {
                stats.polysyllables += 1;
                let proper = word.text.chars().next().is_some_and(char::is_uppercase);
                if !proper {
                    stats.complex_words += 1;
                }
            }
        }

        stats
    }

    fn words_f(&self) -> f64 {
        self.words.max(1) as f64
    }

    fn sentences_f(&self) -> f64 {
        self.sentences.max(1) as f64
    }
}

/// Flesch-Kincaid grade level.
pub fn flesch_kincaid_grade(s: &TextStats) -> f64 {
    0.39 * (s.words_f() / s.sentences_f()) + 11.8 * (s.syllables as f64 / s.words_f()) - 15.59
}

/// Gunning fog index.
pub fn gunning_fog(s: &TextStats) -> f64 {
    0.4 * ((s.words_f() / s.sentences_f()) + 100.0 * (s.complex_words as f64 / s.words_f()))
}

/// SMOG grade.
pub fn smog(s: &TextStats) -> f64 {
    1.0430 * (s.polysyllables as f64 * (30.0 / s.sentences_f())).sqrt() + 3.1291
}

/// Coleman-Liau index.
pub fn coleman_liau(s: &TextStats) -> f64 {
    let l = 100.0 * s.characters as f64 / s.words_f();
    let c = 100.0 * s.sentences_f() / s.words_f();
    0.0588 * l - 0.296 * c - 15.8
}

/// Automated Readability Index.
pub fn automated_readability_index(s: &TextStats) -> f64 {
    4.71 * (s.characters as f64 / s.words_f()) + 0.5 * (s.words_f() / s.sentences_f()) - 21.43
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_counts() {
        let stats = TextStats::compute("The cat sat. The dog ran away.");
        assert_eq!(stats.sentences, 2);
        assert_eq!(stats.words, 7);
        assert!(stats.syllables >= 7);
    }

    #[test]
    fn test_complex_words_exclude_proper_nouns() {
        let stats = TextStats::compute("Generally Alexandria vanished.");
        // "Generally" and "vanished" are common words; "Alexandria" is a
        // proper noun and counts only as a polysyllable.
        assert!(stats.polysyllables > stats.complex_words);
    }

    #[test]
    fn test_simple_text_scores_low() {
        let stats = TextStats::compute("The cat sat. The dog ran. I see it.");
        assert!(flesch_kincaid_grade(&stats) < 5.0);
        assert!(gunning_fog(&stats) < 6.0);
    }

    #[test]
    fn test_dense_text_scores_higher() {
        let simple = TextStats::compute("The cat sat. The dog ran.");
        let dense = TextStats::compute(
            "Organizational heterogeneity necessitates comprehensive \
             interdepartmental communication infrastructure implementations \
             notwithstanding institutional considerations.",
        );
        assert!(flesch_kincaid_grade(&dense) > flesch_kincaid_grade(&simple));
        assert!(coleman_liau(&dense) > coleman_liau(&simple));
        assert!(automated_readability_index(&dense) > automated_readability_index(&simple));
    }

    #[test]
    fn test_empty_input_is_finite() {
        let stats = TextStats::compute("");
        for metric in [
            flesch_kincaid_grade(&stats),
            gunning_fog(&stats),
            smog(&stats),
            coleman_liau(&stats),
            automated_readability_index(&stats),
        ] {
            assert!(metric.is_finite());
        }
    }

    #[test]
    fn test_smog_monotone_in_polysyllables() {
        let a = TextStats {
            sentences: 10,
            polysyllables: 5,
            ..Default::default()
        };
        let b = TextStats {
            sentences: 10,
            polysyllables: 20,
            ..Default::default()
        };
        assert!(smog(&b) > smog(&a));
    }
}
