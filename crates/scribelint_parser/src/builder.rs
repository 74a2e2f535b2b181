//! Incremental assembly of prose blocks from discontiguous source runs.

use scribelint_ast::{Block, OffsetMap, ScopePath, Span};
use scribelint_text::SentenceSplitter;

/// Accumulates text runs extracted from a document, tracking for each run
/// where it came from, then emits sentence-level blocks.
#[derive(Debug, Default)]
pub struct BlockBuilder {
    text: String,
    offsets: OffsetMap,
    masked: Vec<Span>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends a run of text that starts at `doc_pos` in the source.
    pub fn push_run(&mut self, text: &str, doc_pos: u32) {
        self.offsets.push(self.text.len() as u32, doc_pos);
        self.text.push_str(text);
    }

    /// Appends a run whose content must not trigger alerts (inline code).
    pub fn push_masked_run(&mut self, text: &str, doc_pos: u32) {
        let start = self.text.len() as u32;
        self.push_run(text, doc_pos);
        self.masked.push(Span::new(start, self.text.len() as u32));
    }

    /// Emits the accumulated text as a single block.
    pub fn into_block(self, scope: ScopePath) -> Block {
        let mut block = Block::mapped(self.text, scope, self.offsets);
        block.masked = self.masked;
        block
    }

    /// Splits the accumulated text into sentences and emits one block per
    /// sentence, scope extended with a `sentence` tag.
    pub fn into_sentence_blocks(self, scope: &ScopePath) -> Vec<Block> {
        let ranges: Vec<_> = self
            .masked
            .iter()
            .map(|s| s.start as usize..s.end as usize)
            .collect();
        let sentence_scope = scope.child("sentence");

        SentenceSplitter::split(&self.text, &ranges)
            .into_iter()
            .map(|sentence| {
                let start = sentence.span.start as u32;
                let end = sentence.span.end as u32;
                let mut block = Block::mapped(
                    sentence.text,
                    sentence_scope.clone(),
                    self.offsets.rebase(start),
                );
                block.masked = self
                    .masked
                    .iter()
                    .filter(|m| m.overlaps(&Span::new(start, end)))
                    .map(|m| Span::new(m.start.saturating_sub(start), m.end.min(end) - start))
                    .collect();
                block
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_run_offsets() {
        let mut b = BlockBuilder::new();
        b.push_run("hello world", 40);
        let block = b.into_block(ScopePath::parse("text.paragraph"));
        assert_eq!(block.offsets.to_doc(6), 46);
    }

    #[test]
    fn test_stitched_runs() {
        let mut b = BlockBuilder::new();
        b.push_run("bold", 10);
        b.push_run(" and plain", 20);
        let block = b.into_block(ScopePath::parse("text.paragraph"));
        assert_eq!(block.text, "bold and plain");
        assert_eq!(block.offsets.to_doc(0), 10);
        assert_eq!(block.offsets.to_doc(4), 20);
        assert_eq!(block.offsets.to_doc(9), 25);
    }

    #[test]
    fn test_sentence_blocks_inherit_offsets() {
        let mut b = BlockBuilder::new();
        b.push_run("First one. Second one.", 100);
        let blocks = b.into_sentence_blocks(&ScopePath::parse("text.paragraph"));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].scope.to_string(), "text.paragraph.sentence");
        // " Second one." starts at block offset 10.
        assert_eq!(blocks[1].offsets.to_doc(0), 110);
    }

    #[test]
    fn test_masked_run_blocks_sentence_split() {
        let mut b = BlockBuilder::new();
        b.push_run("Run ", 0);
        b.push_masked_run("cmd. arg", 5);
        b.push_run(" now.", 14);
        let blocks = b.into_sentence_blocks(&ScopePath::parse("text.paragraph"));
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_masked(Span::new(5, 7)));
    }
}
