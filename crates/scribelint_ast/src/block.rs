//! Blocks: segmented text fragments carrying a scope path and an offset map
//! back to the original source bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// The structural context a block sits in, as an ordered sequence of
/// lowercase tags (`text.paragraph.sentence`, `text.heading.h2`,
/// `comment.line`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopePath(Vec<String>);

impl ScopePath {
    /// Creates a scope path from individual tags.
    ///
    /// Tags are lowercased; empty tags are dropped.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = tags
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self(tags)
    }

    /// Parses a dot-separated scope string (`"text.paragraph.sentence"`).
    pub fn parse(s: &str) -> Self {
        Self::new(s.split('.'))
    }

    /// Returns the tags in order.
    pub fn tags(&self) -> &[String] {
        &self.0
    }

    /// Returns a copy with `tag` appended.
    pub fn child(&self, tag: &str) -> Self {
        let mut tags = self.0.clone();
        tags.push(tag.to_lowercase());
        Self(tags)
    }

    /// Returns true if the path contains the given tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A sorted set of `(block_pos, doc_pos)` anchors translating offsets inside
/// a block's text back into offsets in the original document.
///
/// Anchors are added in block order as the segmenter extracts text runs; a
/// lookup finds the last anchor at or before the queried offset and applies
/// its delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    anchors: Vec<(u32, u32)>,
}

impl OffsetMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map for a block whose text is a contiguous slice of the
    /// document starting at `doc_pos`.
    pub fn contiguous(doc_pos: u32) -> Self {
        Self {
            anchors: vec![(0, doc_pos)],
        }
    }

    /// Appends an anchor. Anchors must be pushed in increasing block order.
    pub fn push(&mut self, block_pos: u32, doc_pos: u32) {
        debug_assert!(
            self.anchors.last().map_or(true, |&(b, _)| b <= block_pos),
            "offset map anchors must be sorted"
        );
        self.anchors.push((block_pos, doc_pos));
    }

    /// Translates a block-relative byte offset into a document offset.
    pub fn to_doc(&self, block_off: u32) -> u32 {
        let idx = self.anchors.partition_point(|&(b, _)| b <= block_off);
        match idx.checked_sub(1).map(|i| self.anchors[i]) {
            Some((b, d)) => d + (block_off - b),
            None => block_off,
        }
    }

    /// Translates a block-relative span into a document span.
    pub fn span_to_doc(&self, span: Span) -> Span {
        Span::new(self.to_doc(span.start), self.to_doc(span.end))
    }

    /// Shifts every anchor's block position by `delta`, for carving a
    /// sub-block out of an already-mapped block.
    pub fn rebase(&self, delta: u32) -> Self {
        let mut anchors = vec![(0, self.to_doc(delta))];
        anchors.extend(
            self.anchors
                .iter()
                .filter(|&&(b, _)| b > delta)
                .map(|&(b, d)| (b - delta, d)),
        );
        Self { anchors }
    }
}

/// A text fragment extracted from a document by the segmenter.
///
/// Blocks are read-only after construction; rules match against `text` and
/// translate their findings through `offsets`.
#[derive(Debug, Clone)]
pub struct Block {
    /// The extracted text, markup stripped.
    pub text: String,
    /// The structural context of the fragment.
    pub scope: ScopePath,
    /// Back-references into the document's source bytes.
    pub offsets: OffsetMap,
    /// Block-relative ranges rules must not alert inside (inline code,
    /// user-configured token ignores).
    pub masked: Vec<Span>,
}

impl Block {
    /// Creates a block whose text is a contiguous slice of the document.
    pub fn contiguous(text: impl Into<String>, scope: ScopePath, doc_start: u32) -> Self {
        Self {
            text: text.into(),
            scope,
            offsets: OffsetMap::contiguous(doc_start),
            masked: Vec::new(),
        }
    }

    /// Creates a block with an explicit offset map.
    pub fn mapped(text: impl Into<String>, scope: ScopePath, offsets: OffsetMap) -> Self {
        Self {
            text: text.into(),
            scope,
            offsets,
            masked: Vec::new(),
        }
    }

    /// Returns true if the given block-relative span overlaps a masked
    /// range.
    pub fn is_masked(&self, span: Span) -> bool {
        self.masked.iter().any(|m| m.overlaps(&span))
    }
}
