// src/api/mod.rs
//! Remote API interaction — transport, pagination, resolution, and
//! materialization.
//!
//! Clear separation between I/O, parsing, and tree logic: the transport
//! moves JSON, the parser shapes it, and everything above depends on the
//! `DocumentSource` trait rather than HTTP details.

pub mod endpoints;
pub mod materialize;
pub mod pagination;
pub mod parser;
pub mod resolve;
pub mod retry;
pub mod transport;

use crate::error::AppError;
use crate::model::{Block, Database, PageHandle};
use crate::types::{BlockId, DataSourceId, DatabaseId, PageId};
use pagination::Paginated;

/// The ability to read and write a remote document workspace.
///
/// This is the fundamental seam for API interaction: the materializer,
/// the parent resolver, and the conversion pipeline depend on this
/// trait, never on HTTP details, which is what makes them testable
/// against in-memory fakes.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    async fn get_page(&self, id: &PageId) -> Result<PageHandle, AppError>;

    async fn create_page(
        &self,
        target: &DataSourceId,
        properties: serde_json::Value,
    ) -> Result<PageHandle, AppError>;

    async fn update_page_properties(
        &self,
        id: &PageId,
        properties: serde_json::Value,
    ) -> Result<PageHandle, AppError>;

    async fn get_database(&self, id: &DatabaseId) -> Result<Database, AppError>;

    async fn query_data_source(
        &self,
        target: &DataSourceId,
        query: endpoints::QueryRequest,
    ) -> Result<Paginated<PageHandle>, AppError>;

    async fn list_children(
        &self,
        parent: &BlockId,
        cursor: Option<String>,
    ) -> Result<Paginated<Block>, AppError>;

    /// Every child of `parent`, all pages walked.
    async fn list_all_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
        pagination::fetch_all(|cursor| self.list_children(parent, cursor)).await
    }
}

pub use endpoints::ApiClient;
pub use transport::Transport;
