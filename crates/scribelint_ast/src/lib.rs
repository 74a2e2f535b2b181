//! # scribelint_ast
//!
//! Foundational types shared by every scribelint crate:
//!
//! - [`Span`] / [`Position`]: byte offsets and line/column locations
//! - [`ScopePath`]: the dot-separated structural context of a block
//! - [`Block`]: a segmented text fragment with an offset map back to source
//! - [`LineIndex`]: offset-to-position translation for a whole document

mod block;
mod span;

pub use block::{Block, OffsetMap, ScopePath};
pub use span::{LineIndex, Position, Span};
