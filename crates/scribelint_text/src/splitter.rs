use std::ops::Range;

/// Abbreviations that end with a period but do not end a sentence.
///
/// Compared case-insensitively against the word preceding the period,
/// with internal periods removed (`e.g.` is looked up as `eg`).
const ABBREVIATIONS: &[&str] = &[
    "al", "approx", "apr", "aug", "ave", "cf", "co", "corp", "dec", "dept", "dr", "eg", "et",
    "etc", "feb", "fig", "gen", "gov", "hon", "ie", "inc", "jan", "jr", "jul", "jun", "lt", "ltd",
    "mar", "messrs", "mr", "mrs", "ms", "mt", "no", "nov", "oct", "p", "pp", "prof", "rep", "rev",
    "sen", "sep", "sept", "sgt", "sr", "st", "univ", "vol", "vs",
];

/// A sentence unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// The text content of the sentence.
    pub text: String,
    /// The byte range of the sentence in the input (including trailing
    /// punctuation).
    pub span: Range<usize>,
}

/// A sentence splitter that handles prose with ignored ranges (e.g. inline
/// code) and common English abbreviations.
pub struct SentenceSplitter;

impl SentenceSplitter {
    /// Splits text into sentences, respecting ignored ranges.
    ///
    /// `ignore_ranges` marks byte ranges treated as opaque: no sentence
    /// boundary is created inside them.
    ///
    /// Boundary rules:
    /// - `.`, `!`, `?` end a sentence when followed by whitespace or EOF,
    ///   unless the `.` terminates a known abbreviation, a single-letter
    ///   initial, or sits inside a number or dotted token.
    /// - A blank line (`\n\n`) is a paragraph break and always splits.
    /// - A single `\n` is retained as part of the text.
    pub fn split(text: &str, ignore_ranges: &[Range<usize>]) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        let mut sorted_ignore = ignore_ranges.to_vec();
        sorted_ignore.sort_by_key(|r| r.start);

        while let Some((idx, c)) = chars.next() {
            let pos = sorted_ignore.partition_point(|r| r.end <= idx);
            let is_ignored = pos < sorted_ignore.len() && sorted_ignore[pos].start <= idx;
            if is_ignored {
                continue;
            }

            let (is_sentence_end, extra_len) = match c {
                '!' | '?' => match chars.peek() {
                    Some((_, next)) if next.is_whitespace() => (true, 0),
                    Some(_) => (false, 0),
                    None => (true, 0),
                },
                '.' => {
                    let followed_ok = match chars.peek() {
                        Some((_, next)) => next.is_whitespace(),
                        None => true,
                    };
                    (followed_ok && !Self::is_abbreviation_end(text, idx), 0)
                }
                '\n' => match chars.peek() {
                    Some((_, '\n')) => {
                        chars.next();
                        (true, 1)
                    }
                    _ => (false, 0),
                },
                _ => (false, 0),
            };

            if is_sentence_end {
                let end = idx + c.len_utf8() + extra_len;
                let sentence_text = &text[start..end];
                if !sentence_text.trim().is_empty() {
                    sentences.push(Sentence {
                        text: sentence_text.to_string(),
                        span: start..end,
                    });
                }
                start = end;
            }
        }

        if start < text.len() {
            let sentence_text = &text[start..];
            if !sentence_text.trim().is_empty() {
                sentences.push(Sentence {
                    text: sentence_text.to_string(),
                    span: start..text.len(),
                });
            }
        }

        sentences
    }

    /// Returns true if the period at `dot_idx` ends an abbreviation,
    /// initialism, or number rather than a sentence.
    fn is_abbreviation_end(text: &str, dot_idx: usize) -> bool {
        let before = &text[..dot_idx];
        let word_start = before
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &before[word_start..];

        if word.is_empty() {
            return false;
        }

        // "3.14." style: a trailing digit never ends an abbreviation check
        // here, but "No. 5" style ordinals do; treat plain numbers as
        // sentence-enders.
        if word.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return false;
        }

        // Single-letter initials: "J. K. Rowling".
        if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
            return true;
        }

        let normalized: String = word
            .chars()
            .filter(|c| *c != '.')
            .collect::<String>()
            .to_lowercase();
        ABBREVIATIONS.binary_search(&normalized.as_str()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        let sentences = SentenceSplitter::split("One sentence. Another one.", &[]);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "One sentence.");
        assert_eq!(sentences[1].text, " Another one.");
    }

    #[test]
    fn test_split_spans_round_trip() {
        let text = "First. Second! Third?";
        for s in SentenceSplitter::split(text, &[]) {
            assert_eq!(&text[s.span.clone()], s.text);
        }
    }

    #[test]
    fn test_split_ignore_code() {
        let text = "Run `cmd. arg` to start. Done.";
        let tick = text.find('`').unwrap();
        let close = text.rfind('`').unwrap();
        let sentences = SentenceSplitter::split(text, &[tick..close + 1]);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Run `cmd. arg` to start.");
    }

    #[test]
    fn test_split_abbreviations() {
        let sentences = SentenceSplitter::split("See Dr. Smith vs. the board. Next.", &[]);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "See Dr. Smith vs. the board.");
    }

    #[test]
    fn test_split_eg() {
        let sentences = SentenceSplitter::split("Fruit, e.g. apples, is good. Right.", &[]);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_split_initials() {
        let sentences = SentenceSplitter::split("Ask J. K. Rowling. Then leave.", &[]);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Ask J. K. Rowling.");
    }

    #[test]
    fn test_split_numbers() {
        let sentences = SentenceSplitter::split("Pi is 3.14 roughly. Yes.", &[]);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_split_paragraph_break() {
        let sentences = SentenceSplitter::split("One\n\nTwo", &[]);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "One\n\n");
        assert_eq!(sentences[1].text, "Two");
    }

    #[test]
    fn test_split_single_newline_kept() {
        let sentences = SentenceSplitter::split("One line.\nSame paragraph.", &[]);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].text, "\nSame paragraph.");
    }

    #[test]
    fn test_split_empty() {
        assert!(SentenceSplitter::split("", &[]).is_empty());
    }

    #[test]
    fn test_split_no_punctuation() {
        let sentences = SentenceSplitter::split("just a fragment", &[]);
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_split_exclamation_without_space() {
        let sentences = SentenceSplitter::split("Wow!Really", &[]);
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_abbreviations_sorted_for_binary_search() {
        let mut sorted = ABBREVIATIONS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ABBREVIATIONS);
    }
}
