//! Plain-text fallback segmentation.

use scribelint_ast::{Block, ScopePath};

use crate::builder::BlockBuilder;

/// Segments plain text: paragraphs split on blank lines, sentences within,
/// every block scoped `text.paragraph.sentence`.
pub fn segment(source: &str) -> Vec<Block> {
    let scope = ScopePath::parse("text.paragraph");
    let mut blocks = Vec::new();

    let mut para_start = 0usize;
    let mut offset = 0usize;
    let flush = |start: usize, end: usize, blocks: &mut Vec<Block>| {
        let para = &source[start..end];
        if para.trim().is_empty() {
            return;
        }
        let mut builder = BlockBuilder::new();
        builder.push_run(para, start as u32);
        blocks.extend(builder.into_sentence_blocks(&scope));
    };

    let bytes = source.as_bytes();
    while offset < bytes.len() {
        // A paragraph ends at a blank line (two consecutive newlines,
        // ignoring intervening spaces).
        if bytes[offset] == b'\n' {
            let mut lookahead = offset + 1;
            while lookahead < bytes.len() && (bytes[lookahead] == b' ' || bytes[lookahead] == b'\t')
            {
                lookahead += 1;
            }
            if lookahead < bytes.len() && bytes[lookahead] == b'\n' {
                flush(para_start, offset, &mut blocks);
                offset = lookahead + 1;
                para_start = offset;
                continue;
            }
        }
        offset += 1;
    }
    flush(para_start, source.len(), &mut blocks);

    blocks
}
