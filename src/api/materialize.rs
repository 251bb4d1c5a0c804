// src/api/materialize.rs
//! Recursive block tree materialization.
//!
//! Blocks arrive flat, flagged with `has_children`; this module turns
//! them into an explicit `MaterializedNode` tree by fetching children on
//! demand. Sibling fetches run concurrently, but results embed in the
//! original sibling order — scatter-gather, not a completion-order
//! queue.
//!
//! Partial-failure policy: a failed child fetch never fails the
//! document. The node is kept with an empty child list and marked
//! incomplete; only the root block list (fetched by the caller) can
//! surface an error.

use crate::constants::MAX_FETCH_DEPTH;
use crate::model::{Block, MaterializedNode};
use super::DocumentSource;
use futures::future::{BoxFuture, FutureExt};

/// Builds explicit trees from `has_children`-flagged blocks.
pub struct TreeMaterializer<'a> {
    source: &'a dyn DocumentSource,
}

impl<'a> TreeMaterializer<'a> {
    pub fn new(source: &'a dyn DocumentSource) -> Self {
        Self { source }
    }

    /// Materializes every root block and its transitive children.
    ///
    /// Infallible by design: all child-fetch errors are absorbed into
    /// incomplete nodes. The roots themselves were already fetched by
    /// the caller, which is where a root failure surfaces.
    pub async fn materialize(&self, roots: Vec<Block>) -> Vec<MaterializedNode> {
        self.materialize_level(roots, 0).await
    }

    fn materialize_level(
        &self,
        blocks: Vec<Block>,
        depth: usize,
    ) -> BoxFuture<'_, Vec<MaterializedNode>> {
        async move {
            // join_all preserves input order regardless of completion order.
            let nodes = blocks
                .into_iter()
                .map(|block| self.materialize_block(block, depth));
            futures::future::join_all(nodes).await
        }
        .boxed()
    }

    async fn materialize_block(&self, block: Block, depth: usize) -> MaterializedNode {
        if !block.has_children {
            return MaterializedNode::leaf(block);
        }

        if depth >= MAX_FETCH_DEPTH {
            log::warn!(
                "Block {} sits at the depth limit ({}); marking its subtree incomplete",
                block.id,
                MAX_FETCH_DEPTH
            );
            return MaterializedNode::incomplete(block);
        }

        match self.source.list_all_children(&block.id).await {
            Ok(children) => {
                let child_nodes = self.materialize_level(children, depth + 1).await;
                MaterializedNode::new(block, child_nodes)
            }
            Err(error) => {
                log::warn!(
                    "Absorbing child fetch failure for block {}: {}",
                    block.id,
                    error
                );
                MaterializedNode::incomplete(block)
            }
        }
    }
}
