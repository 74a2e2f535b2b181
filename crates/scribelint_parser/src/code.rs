//! Comment and string extraction for source-code files.
//!
//! A deliberately small lexer per language family: only comments and string
//! literals are lintable prose, so the scanner tracks just enough state to
//! find them and skip everything else.

use scribelint_ast::{Block, ScopePath};

/// A language whose comment and string syntax the segmenter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Go,
    Java,
    JavaScript,
    Python,
    Ruby,
    Rust,
    Shell,
}

/// Lexical syntax of a language, restricted to what prose extraction needs.
struct Syntax {
    line_comment: &'static str,
    block_comment: Option<(&'static str, &'static str)>,
    /// String delimiters, longest first so triple quotes win over singles.
    strings: &'static [&'static str],
    /// Whether a backslash escapes the next character inside strings.
    escapes: bool,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "c" | "h" | "cc" | "cpp" | "cxx" | "hpp" => Some(Language::C),
            "go" => Some(Language::Go),
            "java" | "kt" | "scala" => Some(Language::Java),
            "js" | "jsx" | "ts" | "tsx" | "mjs" => Some(Language::JavaScript),
            "py" | "pyi" => Some(Language::Python),
            "rb" => Some(Language::Ruby),
            "rs" => Some(Language::Rust),
            "sh" | "bash" | "zsh" => Some(Language::Shell),
            _ => None,
        }
    }

    fn syntax(&self) -> Syntax {
        match self {
            Language::C | Language::Java => Syntax {
                line_comment: "//",
                block_comment: Some(("/*", "*/")),
                strings: &["\""],
                escapes: true,
            },
            Language::Go => Syntax {
                line_comment: "//",
                block_comment: Some(("/*", "*/")),
                strings: &["\"", "`"],
                escapes: true,
            },
            Language::JavaScript => Syntax {
                line_comment: "//",
                block_comment: Some(("/*", "*/")),
                strings: &["\"", "'", "`"],
                escapes: true,
            },
            Language::Python => Syntax {
                line_comment: "#",
                block_comment: None,
                strings: &["\"\"\"", "'''", "\"", "'"],
                escapes: true,
            },
            Language::Ruby | Language::Shell => Syntax {
                line_comment: "#",
                block_comment: None,
                strings: &["\"", "'"],
                escapes: true,
            },
            Language::Rust => Syntax {
                line_comment: "//",
                block_comment: Some(("/*", "*/")),
                strings: &["\""],
                escapes: true,
            },
        }
    }
}

/// Segments a source file into comment and string blocks.
pub fn segment(source: &str, lang: Language) -> Vec<Block> {
    let syntax = lang.syntax();
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &source[i..];

        if rest.starts_with(syntax.line_comment) {
            let content_start = i + syntax.line_comment.len();
            let line_end = rest.find('\n').map(|n| i + n).unwrap_or(source.len());
            push_trimmed(
                source,
                content_start,
                line_end,
                "comment.line",
                &mut blocks,
            );
            i = line_end;
            continue;
        }

        if let Some((open, close)) = syntax.block_comment {
            if rest.starts_with(open) {
                let content_start = i + open.len();
                let content_end = source[content_start..]
                    .find(close)
                    .map(|n| content_start + n)
                    .unwrap_or(source.len());
                push_trimmed(
                    source,
                    content_start,
                    content_end,
                    "comment.block",
                    &mut blocks,
                );
                i = (content_end + close.len()).min(source.len());
                continue;
            }
        }

        if let Some(delim) = syntax.strings.iter().find(|d| rest.starts_with(**d)) {
            let content_start = i + delim.len();
            let content_end = find_string_end(source, content_start, delim, syntax.escapes);
            push_trimmed(source, content_start, content_end, "raw.string", &mut blocks);
            i = (content_end + delim.len()).min(source.len());
            continue;
        }

        // Advance one full character.
        i += source[i..].chars().next().map_or(1, char::len_utf8);
    }

    blocks
}

/// Finds the end of a string opened with `delim`, honoring backslash
/// escapes. Unterminated single-line strings stop at the line end.
fn find_string_end(source: &str, start: usize, delim: &str, escapes: bool) -> usize {
    let bytes = source.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        if escapes && bytes[i] == b'\\' {
            i += 1;
            i += source[i..].chars().next().map_or(0, char::len_utf8);
            continue;
        }
        if source[i..].starts_with(delim) {
            return i;
        }
        if delim.len() == 1 && bytes[i] == b'\n' {
            return i;
        }
        i += source[i..].chars().next().map_or(1, char::len_utf8);
    }
    source.len()
}

fn push_trimmed(source: &str, start: usize, end: usize, scope: &str, blocks: &mut Vec<Block>) {
    if start >= end {
        return;
    }
    let raw = &source[start..end];
    let leading = raw.len() - raw.trim_start().len();
    let text = raw.trim_end();
    let text = &text[leading.min(text.len())..];
    if text.is_empty() {
        return;
    }
    blocks.push(Block::contiguous(
        text,
        ScopePath::parse(scope),
        (start + leading) as u32,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribelint_ast::Span;

    fn round_trip(source: &str, lang: Language) {
        for block in segment(source, lang) {
            let span = block
                .offsets
                .span_to_doc(Span::new(0, block.text.len() as u32));
            assert_eq!(&source[span.start as usize..span.end as usize], block.text);
        }
    }

    #[test]
    fn test_rust_line_comment() {
        let source = "fn main() {\n    // handles the edge case\n}\n";
        let blocks = segment(source, Language::Rust);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].scope.to_string(), "comment.line");
        assert_eq!(blocks[0].text, "handles the edge case");
        round_trip(source, Language::Rust);
    }

    #[test]
    fn test_rust_block_comment() {
        let source = "/* spans\nlines */ fn f() {}";
        let blocks = segment(source, Language::Rust);
        assert_eq!(blocks[0].scope.to_string(), "comment.block");
        assert_eq!(blocks[0].text, "spans\nlines");
    }

    #[test]
    fn test_string_literal() {
        let source = r#"let msg = "hello there";"#;
        let blocks = segment(source, Language::Rust);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].scope.to_string(), "raw.string");
        assert_eq!(blocks[0].text, "hello there");
        round_trip(source, Language::Rust);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let source = r#"x = "say \"hi\" now";"#;
        let blocks = segment(source, Language::Rust);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, r#"say \"hi\" now"#);
    }

    #[test]
    fn test_comment_marker_inside_string_ignored() {
        let source = r#"url = "https://example.com";"#;
        let blocks = segment(source, Language::Rust);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].scope.to_string(), "raw.string");
    }

    #[test]
    fn test_python_triple_quoted() {
        let source = "def f():\n    \"\"\"Docstring prose here.\"\"\"\n    pass\n";
        let blocks = segment(source, Language::Python);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Docstring prose here.");
        round_trip(source, Language::Python);
    }

    #[test]
    fn test_python_hash_comment() {
        let source = "x = 1  # the counter\n";
        let blocks = segment(source, Language::Python);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].scope.to_string(), "comment.line");
        assert_eq!(blocks[0].text, "the counter");
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let source = "a = \"oops\nb = 1\n";
        let blocks = segment(source, Language::Python);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "oops");
    }

    #[test]
    fn test_shell() {
        let source = "#!/bin/sh\necho \"done now\" # trailing note\n";
        let blocks = segment(source, Language::Shell);
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("zig"), None);
    }

    #[test]
    fn test_empty_source() {
        assert!(segment("", Language::Rust).is_empty());
    }
}
