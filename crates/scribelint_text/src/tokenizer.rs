use std::ops::Range;

/// A token produced by [`Tokenizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The surface text of the token.
    pub text: String,
    /// Byte range in the original text.
    pub span: Range<usize>,
}

/// A word and punctuation tokenizer for prose.
///
/// A word is a run of Unicode letters or digits, optionally containing
/// embedded apostrophes or hyphens (`don't`, `well-known`). Everything else
/// that is not whitespace becomes a single-character punctuation token.
#[derive(Debug, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenizes into words and punctuation.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut chars = text.char_indices().peekable();

        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else if c.is_alphanumeric() {
                let end = self.consume_word(text, &mut chars);
                tokens.push(Token {
                    text: text[idx..end].to_string(),
                    span: idx..end,
                });
            } else {
                chars.next();
                let end = idx + c.len_utf8();
                tokens.push(Token {
                    text: text[idx..end].to_string(),
                    span: idx..end,
                });
            }
        }

        tokens
    }

    /// Tokenizes into word-like tokens only, skipping punctuation.
    pub fn words(&self, text: &str) -> Vec<Token> {
        self.tokenize(text)
            .into_iter()
            .filter(|t| t.text.chars().any(char::is_alphanumeric))
            .collect()
    }

    fn consume_word(
        &self,
        text: &str,
        chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    ) -> usize {
        let mut end = 0;
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_alphanumeric() {
                chars.next();
                end = idx + c.len_utf8();
            } else if c == '\'' || c == '-' || c == '\u{2019}' {
                // Connectors are part of the word only when followed by
                // another alphanumeric character.
                let connector_end = idx + c.len_utf8();
                let next_is_word = text[connector_end..]
                    .chars()
                    .next()
                    .map_or(false, char::is_alphanumeric);
                if next_is_word {
                    chars.next();
                    end = connector_end;
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let tokens = Tokenizer::new().tokenize("The cat sat.");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "cat", "sat", "."]);
    }

    #[test]
    fn test_tokenize_spans_round_trip() {
        let text = "Hello, world! It's well-known.";
        for t in Tokenizer::new().tokenize(text) {
            assert_eq!(&text[t.span.clone()], t.text);
        }
    }

    #[test]
    fn test_tokenize_contractions() {
        let tokens = Tokenizer::new().words("don't can't won't");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["don't", "can't", "won't"]);
    }

    #[test]
    fn test_tokenize_hyphenated() {
        let tokens = Tokenizer::new().words("a well-known fact");
        assert_eq!(tokens[1].text, "well-known");
    }

    #[test]
    fn test_trailing_apostrophe_excluded() {
        let tokens = Tokenizer::new().tokenize("the dogs' bones");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["the", "dogs", "'", "bones"]);
    }

    #[test]
    fn test_words_skips_punctuation() {
        let tokens = Tokenizer::new().words("one, two; three.");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(Tokenizer::new().tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_unicode() {
        let tokens = Tokenizer::new().words("naïve café");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["naïve", "café"]);
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = Tokenizer::new().tokenize("version 2 of 10");
        assert_eq!(tokens[1].text, "2");
        assert_eq!(tokens[3].text, "10");
    }
}
