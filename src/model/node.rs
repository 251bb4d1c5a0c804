// src/model/node.rs
//! The materialized block tree.
//!
//! A `MaterializedNode` wraps a fetched `Block` together with its fully
//! realized children. Nodes are built functionally during materialization
//! and never mutated afterwards; the fetched `Block` record itself is
//! never touched, so two call sites can hold the same block without
//! aliasing hazards.

use super::Block;
use serde::{Deserialize, Serialize};

/// An immutable tree node: one block plus its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedNode {
    pub block: Block,
    pub children: Vec<MaterializedNode>,
    /// False when this block's child fetch failed and the subtree was
    /// absorbed as empty rather than failing the whole document.
    pub complete: bool,
}

impl MaterializedNode {
    /// A node whose children (possibly none) were all fetched.
    pub fn new(block: Block, children: Vec<MaterializedNode>) -> Self {
        Self {
            block,
            children,
            complete: true,
        }
    }

    /// A childless node recording that its subtree could not be fetched.
    pub fn incomplete(block: Block) -> Self {
        Self {
            block,
            children: Vec::new(),
            complete: false,
        }
    }

    /// A block with no remote children.
    pub fn leaf(block: Block) -> Self {
        Self::new(block, Vec::new())
    }

    /// Total number of blocks in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(MaterializedNode::subtree_len)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockPayload;

    #[test]
    fn subtree_len_counts_every_node() {
        let leaf = MaterializedNode::leaf(Block::leaf(BlockPayload::Divider));
        let parent = MaterializedNode::new(
            Block::leaf(BlockPayload::Paragraph { rich_text: vec![] }),
            vec![leaf.clone(), leaf],
        );
        assert_eq!(parent.subtree_len(), 3);
    }

    #[test]
    fn incomplete_nodes_are_childless() {
        let node = MaterializedNode::incomplete(Block::leaf(BlockPayload::Divider));
        assert!(!node.complete);
        assert!(node.children.is_empty());
    }
}
