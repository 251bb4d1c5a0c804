// src/convert/mod.rs
//! The conversion pipeline: remote page → `{markdown, plaintext}`.
//!
//! Exactly one failure is caller-visible: the root block listing. Every
//! deeper subtree failure is absorbed during materialization and shows
//! up as an inert marker in otherwise complete output.

pub mod blocks;
pub mod plaintext;
pub mod rich_text;

pub use blocks::{BlockConverter, INCOMPLETE_SUBTREE_MARKER};
pub use plaintext::to_plaintext;
pub use rich_text::MarkdownDialect;

use crate::api::materialize::TreeMaterializer;
use crate::api::DocumentSource;
use crate::error::AppError;
use crate::types::{BlockId, PageId};

/// The portable result of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedDocument {
    pub markdown: String,
    pub plain_text: String,
}

/// Converts one page's block tree.
///
/// Owns its materialized tree for the duration of the call and shares
/// no state with concurrent conversions of other pages.
pub async fn convert_page(
    source: &dyn DocumentSource,
    page: &PageId,
    dialect: MarkdownDialect,
) -> Result<ConvertedDocument, AppError> {
    // The one fetch allowed to fail the conversion.
    let root_block: BlockId = page.into();
    let roots = source.list_all_children(&root_block).await?;
    log::debug!("Fetched {} root blocks for page {}", roots.len(), page);

    let nodes = TreeMaterializer::new(source).materialize(roots).await;
    let incomplete = nodes.iter().filter(|n| !n.complete).count();
    if incomplete > 0 {
        log::warn!(
            "Page {} converted with {} incomplete root subtree(s)",
            page,
            incomplete
        );
    }

    let markdown = BlockConverter::new(dialect).convert_all(&nodes);
    let plain_text = to_plaintext(&markdown);

    Ok(ConvertedDocument {
        markdown,
        plain_text,
    })
}
