//! # scribelint_parser
//!
//! The segmenter: turns raw input of a known format into an ordered stream
//! of [`Block`]s, each tagged with a scope path and an offset map back to
//! the original source bytes.
//!
//! Supported formats:
//!
//! - `markdown`: CommonMark + GFM via the `markdown` crate
//! - `code`: comment and string-literal extraction for common languages
//! - `text`: plain-text fallback (paragraphs split on blank lines)

mod builder;
mod code;
mod error;
mod markdown;
mod plain;

use std::path::Path;

use scribelint_ast::Block;

pub use code::Language;
pub use error::ParseError;

/// The input format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Markdown,
    Code(Language),
    Text,
}

impl Format {
    /// Resolves a format from a file extension, after `[formats]`
    /// remapping has been applied by the caller.
    pub fn from_extension(ext: &str) -> Format {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "md" | "markdown" | "mdown" | "mkd" | "mkdn" => Format::Markdown,
            _ => match Language::from_extension(&ext) {
                Some(lang) => Format::Code(lang),
                None => Format::Text,
            },
        }
    }

    /// Resolves a format from a path.
    pub fn from_path(path: &Path) -> Format {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Format::from_extension)
            .unwrap_or(Format::Text)
    }
}

/// Segments `source` according to `format`.
///
/// `token_ignores` are user-supplied regexes whose matches become masked
/// ranges inside prose blocks.
pub fn segment(
    source: &str,
    format: Format,
    token_ignores: &[regex::Regex],
) -> Result<Vec<Block>, ParseError> {
    let mut blocks = match format {
        Format::Markdown => markdown::segment(source)?,
        Format::Code(lang) => code::segment(source, lang),
        Format::Text => plain::segment(source),
    };

    if !token_ignores.is_empty() {
        for block in &mut blocks {
            for re in token_ignores {
                for m in re.find_iter(&block.text) {
                    block
                        .masked
                        .push(scribelint_ast::Span::new(m.start() as u32, m.end() as u32));
                }
            }
        }
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("md"), Format::Markdown);
        assert_eq!(Format::from_extension("MD"), Format::Markdown);
        assert_eq!(Format::from_extension("txt"), Format::Text);
        assert!(matches!(Format::from_extension("rs"), Format::Code(_)));
    }

    #[test]
    fn test_format_from_path_no_extension() {
        assert_eq!(Format::from_path(Path::new("README")), Format::Text);
    }

    #[test]
    fn test_segment_applies_token_ignores() {
        let re = regex::Regex::new(r"\{\{.+?\}\}").unwrap();
        let blocks = segment("Value is {{ var }} here.", Format::Text, &[re]).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].masked.is_empty());
    }

    #[test]
    fn test_segment_round_trips_spans() {
        let source = "# Title\n\nSome prose here. More prose there.\n";
        let blocks = segment(source, Format::Markdown, &[]).unwrap();
        for block in &blocks {
            let doc_span = block
                .offsets
                .span_to_doc(scribelint_ast::Span::new(0, block.text.len() as u32));
            assert_eq!(
                &source[doc_span.start as usize..doc_span.end as usize],
                block.text
            );
        }
    }
}
