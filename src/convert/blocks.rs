// src/convert/blocks.rs
//! Converting materialized block trees into markdown fragments.
//!
//! One fragment per block, newline-terminated per logical line, two
//! spaces of indentation per nesting level. Unknown block types never
//! raise: anything rich-text-shaped in their payload still renders, and
//! the rest degrades to an inert comment naming the type — document
//! completeness over fidelity.

use crate::api::parser::parse_rich_text;
use crate::constants::{CHARS_PER_BLOCK_ESTIMATE, INDENT_SPACES};
use crate::model::{BlockPayload, MaterializedNode};
use crate::types::RichTextSpan;
use super::rich_text::{render_spans, MarkdownDialect};

/// Marker embedded where a subtree could not be fetched.
pub const INCOMPLETE_SUBTREE_MARKER: &str = "<!-- subtree incomplete: children not fetched -->";

/// Converts materialized nodes to markdown for one target dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockConverter {
    dialect: MarkdownDialect,
}

impl BlockConverter {
    pub fn new(dialect: MarkdownDialect) -> Self {
        Self { dialect }
    }

    /// Converts a whole document: every root node in order.
    pub fn convert_all(&self, nodes: &[MaterializedNode]) -> String {
        let mut output = String::with_capacity(nodes.len() * CHARS_PER_BLOCK_ESTIMATE);
        for node in nodes {
            output.push_str(&self.convert(node, 0));
        }
        output
    }

    /// Converts one node and its children at the given nesting level.
    pub fn convert(&self, node: &MaterializedNode, indent_level: usize) -> String {
        if node.block.archived {
            return String::new();
        }

        let indent = " ".repeat(indent_level * INDENT_SPACES);
        let mut output = match &node.block.payload {
            BlockPayload::Paragraph { rich_text } => self.plain_line(rich_text, &indent, ""),
            BlockPayload::Heading1 { rich_text } => self.plain_line(rich_text, &indent, "# "),
            BlockPayload::Heading2 { rich_text } => self.plain_line(rich_text, &indent, "## "),
            BlockPayload::Heading3 { rich_text } => self.plain_line(rich_text, &indent, "### "),
            BlockPayload::BulletedListItem { rich_text } => {
                format!("{}- {}\n", indent, self.inline(rich_text))
            }
            BlockPayload::NumberedListItem { rich_text } => {
                format!("{}1. {}\n", indent, self.inline(rich_text))
            }
            BlockPayload::ToDo { rich_text, checked } => {
                let mark = if *checked { "[x]" } else { "[ ]" };
                format!("{}{} {}\n", indent, mark, self.inline(rich_text))
            }
            BlockPayload::Toggle { rich_text } => {
                return self.convert_toggle(node, rich_text, indent_level);
            }
            BlockPayload::Quote { rich_text } => {
                quoted(&self.inline(rich_text), &indent)
            }
            BlockPayload::Callout { rich_text, icon } => {
                let glyph = icon.as_deref().unwrap_or("💡");
                quoted(&format!("{} {}", glyph, self.inline(rich_text)), &indent)
            }
            BlockPayload::Code { rich_text, language } => {
                let source: String = rich_text
                    .iter()
                    .map(|span| span.plain_text.as_str())
                    .collect();
                format!("{i}```{lang}\n{src}\n{i}```\n", i = indent, lang = language, src = source)
            }
            BlockPayload::Divider => format!("{}---\n", indent),
            BlockPayload::ChildPage { title } => {
                // A placeholder link to the page, never its content.
                format!(
                    "{}[{}](https://www.notion.so/{})\n",
                    indent,
                    title,
                    node.block.id.as_str()
                )
            }
            BlockPayload::Unknown { block_type, data } => {
                self.convert_unknown(block_type, data, &indent)
            }
        };

        // Child pages delegate to their own documents; everything else
        // nests its converted children one level deeper.
        if !matches!(node.block.payload, BlockPayload::ChildPage { .. }) {
            for child in &node.children {
                output.push_str(&self.convert(child, indent_level + 1));
            }
        }

        if !node.complete {
            output.push_str(&format!("{}{}\n", indent, INCOMPLETE_SUBTREE_MARKER));
        }

        output
    }

    fn inline(&self, rich_text: &[RichTextSpan]) -> String {
        render_spans(rich_text, self.dialect)
    }

    /// Paragraphs and headings: empty rich text produces no output
    /// rather than a stray marker line.
    fn plain_line(&self, rich_text: &[RichTextSpan], indent: &str, prefix: &str) -> String {
        let text = self.inline(rich_text);
        if text.trim().is_empty() {
            String::new()
        } else {
            format!("{}{}{}\n", indent, prefix, text)
        }
    }

    fn convert_toggle(
        &self,
        node: &MaterializedNode,
        rich_text: &[RichTextSpan],
        indent_level: usize,
    ) -> String {
        let indent = " ".repeat(indent_level * INDENT_SPACES);
        let summary = self.inline(rich_text);

        let mut children = String::new();
        for child in &node.children {
            children.push_str(&self.convert(child, indent_level + 1));
        }

        let mut output = match self.dialect {
            MarkdownDialect::Github => format!(
                "{i}<details><summary>{s}</summary>\n{c}{i}</details>\n",
                i = indent,
                s = summary,
                c = children
            ),
            // No raw HTML in pure CommonMark; the summary becomes a
            // bold line over the nested children.
            MarkdownDialect::CommonMark => {
                format!("{}**{}**\n{}", indent, summary, children)
            }
        };

        if !node.complete {
            output.push_str(&format!("{}{}\n", indent, INCOMPLETE_SUBTREE_MARKER));
        }
        output
    }

    fn convert_unknown(
        &self,
        block_type: &str,
        data: &serde_json::Value,
        indent: &str,
    ) -> String {
        // Render whatever rich-text-shaped content the payload exposes.
        let spans = parse_rich_text(&data["rich_text"]);
        let text = self.inline(&spans);
        if !text.trim().is_empty() {
            return format!("{}{}\n", indent, text);
        }

        format!("{}<!-- unsupported block type: {} -->\n", indent, block_type)
    }
}

/// Prefixes every line with `> ` so multi-line quoted text stays quoted.
fn quoted(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| format!("{}> {}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
