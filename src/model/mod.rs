// src/model/mod.rs
//! Domain model for remote documents.
//!
//! `Block` is a closed sum type: one payload case per supported block
//! type plus an explicit catch-all carrying raw data, so converter
//! dispatch is exhaustively checked by the compiler instead of falling
//! through at runtime.

mod node;

pub use node::MaterializedNode;

use crate::types::{BlockId, DataSourceId, DatabaseId, PageId, RichTextSpan};
use serde::{Deserialize, Serialize};

/// One node of the remote structural document tree.
///
/// Blocks form a tree only via `has_children` plus a subsequent children
/// fetch — there are no inline child references, so cycles are
/// structurally impossible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub has_children: bool,
    pub archived: bool,
    pub payload: BlockPayload,
}

impl Block {
    /// A leaf block with the given payload, for builders and tests.
    pub fn leaf(payload: BlockPayload) -> Self {
        Self {
            id: BlockId::new_v4(),
            has_children: false,
            archived: false,
            payload,
        }
    }

    /// Marks the block as having remotely stored children.
    pub fn with_children_flag(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// The wire name of this block's type.
    pub fn type_name(&self) -> &str {
        self.payload.type_name()
    }

    /// The block's own rich text, when its type carries any.
    pub fn rich_text(&self) -> Option<&[RichTextSpan]> {
        self.payload.rich_text()
    }
}

/// Typed payload per block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockPayload {
    Paragraph {
        rich_text: Vec<RichTextSpan>,
    },
    Heading1 {
        rich_text: Vec<RichTextSpan>,
    },
    Heading2 {
        rich_text: Vec<RichTextSpan>,
    },
    Heading3 {
        rich_text: Vec<RichTextSpan>,
    },
    BulletedListItem {
        rich_text: Vec<RichTextSpan>,
    },
    NumberedListItem {
        rich_text: Vec<RichTextSpan>,
    },
    ToDo {
        rich_text: Vec<RichTextSpan>,
        checked: bool,
    },
    Toggle {
        rich_text: Vec<RichTextSpan>,
    },
    Quote {
        rich_text: Vec<RichTextSpan>,
    },
    Callout {
        rich_text: Vec<RichTextSpan>,
        /// Emoji glyph when the callout carries one.
        icon: Option<String>,
    },
    Code {
        rich_text: Vec<RichTextSpan>,
        language: String,
    },
    Divider,
    ChildPage {
        title: String,
    },
    /// A block type this client doesn't model. The raw type-keyed object
    /// is kept so rich-text-shaped content can still be rendered.
    Unknown {
        block_type: String,
        data: serde_json::Value,
    },
}

impl BlockPayload {
    /// The wire name for this payload's type.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading1 { .. } => "heading_1",
            Self::Heading2 { .. } => "heading_2",
            Self::Heading3 { .. } => "heading_3",
            Self::BulletedListItem { .. } => "bulleted_list_item",
            Self::NumberedListItem { .. } => "numbered_list_item",
            Self::ToDo { .. } => "to_do",
            Self::Toggle { .. } => "toggle",
            Self::Quote { .. } => "quote",
            Self::Callout { .. } => "callout",
            Self::Code { .. } => "code",
            Self::Divider => "divider",
            Self::ChildPage { .. } => "child_page",
            Self::Unknown { block_type, .. } => block_type,
        }
    }

    /// The payload's own rich text, when its type carries any.
    pub fn rich_text(&self) -> Option<&[RichTextSpan]> {
        match self {
            Self::Paragraph { rich_text }
            | Self::Heading1 { rich_text }
            | Self::Heading2 { rich_text }
            | Self::Heading3 { rich_text }
            | Self::BulletedListItem { rich_text }
            | Self::NumberedListItem { rich_text }
            | Self::ToDo { rich_text, .. }
            | Self::Toggle { rich_text }
            | Self::Quote { rich_text }
            | Self::Callout { rich_text, .. }
            | Self::Code { rich_text, .. } => Some(rich_text),
            Self::Divider | Self::ChildPage { .. } | Self::Unknown { .. } => None,
        }
    }
}

/// A container of records that delegates its rows to addressable
/// data sources.
///
/// Write and query operations must target a data source id whenever the
/// database exposes any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: DatabaseId,
    pub title: String,
    pub data_sources: Vec<DataSourceRef>,
    pub archived: bool,
}

/// One addressable data source under a database, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceRef {
    pub id: DataSourceId,
    pub name: String,
}

/// A page as seen by this core: identity plus opaque properties.
///
/// Business entity schemas live upstream; this crate passes property
/// payloads through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageHandle {
    pub id: PageId,
    pub archived: bool,
    pub properties: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RichTextSpan;

    #[test]
    fn type_names_match_the_wire() {
        assert_eq!(BlockPayload::Divider.type_name(), "divider");
        assert_eq!(
            BlockPayload::ToDo {
                rich_text: vec![],
                checked: true
            }
            .type_name(),
            "to_do"
        );
        assert_eq!(
            BlockPayload::Unknown {
                block_type: "synced_block".to_string(),
                data: serde_json::json!({}),
            }
            .type_name(),
            "synced_block"
        );
    }

    #[test]
    fn rich_text_accessor_covers_text_types_only() {
        let para = BlockPayload::Paragraph {
            rich_text: vec![RichTextSpan::plain("x")],
        };
        assert_eq!(para.rich_text().map(|t| t.len()), Some(1));
        assert!(BlockPayload::Divider.rich_text().is_none());
    }
}
