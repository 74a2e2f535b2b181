//! Markdown segmentation using markdown-rs (wooorm/markdown-rs).
//!
//! Walks the mdast tree and extracts prose regions as sentence-level
//! blocks, headings and table cells as whole blocks, and fenced code and
//! raw HTML as opaque blocks. Inline markup is stripped; every extracted
//! text run is anchored back to its source offset.

use markdown::mdast::Node;
use markdown::{to_mdast, ParseOptions};
use scribelint_ast::{Block, ScopePath};

use crate::builder::BlockBuilder;
use crate::error::ParseError;

/// Segments a Markdown document (CommonMark + GFM).
pub fn segment(source: &str) -> Result<Vec<Block>, ParseError> {
    let ast = to_mdast(source, &ParseOptions::gfm())
        .map_err(|e| ParseError::invalid_source(e.to_string()))?;

    let mut blocks = Vec::new();
    walk(&ast, &Context::Root, source, &mut blocks);
    Ok(blocks)
}

/// The container context a node is being visited under, which decides the
/// scope path of the blocks it produces.
enum Context {
    Root,
    ListItem,
    Blockquote,
}

fn walk(node: &Node, ctx: &Context, source: &str, blocks: &mut Vec<Block>) {
    match node {
        Node::Root(root) => {
            for child in &root.children {
                walk(child, ctx, source, blocks);
            }
        }

        Node::Paragraph(para) => {
            let scope = match ctx {
                Context::ListItem => ScopePath::parse("text.list.item"),
                Context::Blockquote => ScopePath::parse("text.blockquote.paragraph"),
                Context::Root => ScopePath::parse("text.paragraph"),
            };
            let mut builder = BlockBuilder::new();
            collect_inline(&para.children, &mut builder);
            if !builder.is_empty() {
                blocks.extend(builder.into_sentence_blocks(&scope));
            }
        }

        Node::Heading(heading) => {
            let scope = ScopePath::parse("text.heading").child(&format!("h{}", heading.depth));
            let mut builder = BlockBuilder::new();
            collect_inline(&heading.children, &mut builder);
            if !builder.is_empty() {
                blocks.push(builder.into_block(scope));
            }
        }

        Node::List(list) => {
            for child in &list.children {
                walk(child, &Context::ListItem, source, blocks);
            }
        }

        Node::ListItem(item) => {
            for child in &item.children {
                walk(child, &Context::ListItem, source, blocks);
            }
        }

        Node::Blockquote(quote) => {
            for child in &quote.children {
                walk(child, &Context::Blockquote, source, blocks);
            }
        }

        Node::Table(table) => {
            for row in &table.children {
                if let Node::TableRow(row) = row {
                    for cell in &row.children {
                        if let Node::TableCell(cell) = cell {
                            let mut builder = BlockBuilder::new();
                            collect_inline(&cell.children, &mut builder);
                            if !builder.is_empty() {
                                blocks.push(builder.into_block(ScopePath::parse("text.table.cell")));
                            }
                        }
                    }
                }
            }
        }

        Node::Code(code) => {
            if let Some(pos) = &code.position {
                blocks.push(Block::contiguous(
                    code.value.clone(),
                    ScopePath::parse("code"),
                    code_content_start(source, pos.start.offset),
                ));
            }
        }

        Node::Html(html) => {
            if let Some(pos) = &html.position {
                blocks.push(Block::contiguous(
                    html.value.clone(),
                    ScopePath::parse("raw"),
                    pos.start.offset as u32,
                ));
            }
        }

        Node::FootnoteDefinition(def) => {
            for child in &def.children {
                walk(child, ctx, source, blocks);
            }
        }

        // Thematic breaks, definitions, and anything unrecognized produce
        // no prose.
        _ => {}
    }
}

/// The mdast span of a code block covers the fences; the content starts on
/// the line after the opening fence. Indented code blocks have no fence and
/// start at the node itself.
fn code_content_start(source: &str, node_start: usize) -> u32 {
    let rest = &source[node_start..];
    if rest.starts_with("```") || rest.starts_with("~~~") {
        match rest.find('\n') {
            Some(nl) => (node_start + nl + 1) as u32,
            None => node_start as u32,
        }
    } else {
        node_start as u32
    }
}

fn collect_inline(children: &[Node], builder: &mut BlockBuilder) {
    for child in children {
        match child {
            Node::Text(text) => {
                if let Some(pos) = &text.position {
                    builder.push_run(&text.value, pos.start.offset as u32);
                }
            }

            Node::InlineCode(code) => {
                if let Some(pos) = &code.position {
                    // Skip the opening backtick so offsets land on the
                    // content.
                    builder.push_masked_run(&code.value, pos.start.offset as u32 + 1);
                }
            }

            Node::Emphasis(em) => collect_inline(&em.children, builder),
            Node::Strong(strong) => collect_inline(&strong.children, builder),
            Node::Delete(del) => collect_inline(&del.children, builder),
            Node::Link(link) => collect_inline(&link.children, builder),
            Node::LinkReference(link) => collect_inline(&link.children, builder),

            Node::Break(br) => {
                if let Some(pos) = &br.position {
                    builder.push_run("\n", pos.start.offset as u32);
                }
            }

            // Images, footnote references, inline HTML, and math carry no
            // lintable prose.
            _ => {}
        }
    }
}
