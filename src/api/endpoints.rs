// src/api/endpoints.rs
//! Typed wrappers over the wire operations.
//!
//! Each method builds the path and body for one endpoint, hands the
//! exchange to the retrying transport, and parses the result. Property
//! payloads stay opaque `serde_json::Value`s: business entity schemas
//! belong to the layers above this crate.

use crate::constants::API_PAGE_SIZE;
use crate::error::AppError;
use crate::model::{Block, Database, PageHandle};
use crate::types::{AccessToken, BlockId, DataSourceId, DatabaseId, PageId};
use super::pagination::Paginated;
use super::parser;
use super::retry::RetryPolicy;
use super::transport::{ApiRequest, Transport};
use super::DocumentSource;
use serde_json::json;
use std::time::Instant;

/// A query against a data source, shaped for `POST .../query`.
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub filter: Option<serde_json::Value>,
    pub sorts: Option<serde_json::Value>,
    pub start_cursor: Option<String>,
}

impl QueryRequest {
    fn into_body(self) -> serde_json::Value {
        let mut body = json!({ "page_size": API_PAGE_SIZE });
        if let Some(filter) = self.filter {
            body["filter"] = filter;
        }
        if let Some(sorts) = self.sorts {
            body["sorts"] = sorts;
        }
        if let Some(cursor) = self.start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        body
    }
}

/// The production `DocumentSource`: typed endpoints over the transport.
pub struct ApiClient {
    transport: Transport,
    /// When set, retries that would overrun this instant abort with
    /// `DeadlineExceeded` instead of sleeping.
    deadline: Option<Instant>,
}

impl ApiClient {
    pub fn new(token: &AccessToken, policy: RetryPolicy) -> Result<Self, AppError> {
        Ok(Self {
            transport: Transport::new(token, policy)?,
            deadline: None,
        })
    }

    /// Wraps an already assembled transport; tests use this with
    /// scripted senders.
    pub fn from_transport(transport: Transport) -> Self {
        Self {
            transport,
            deadline: None,
        }
    }

    /// All subsequent calls abort rather than retry past `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, AppError> {
        self.transport
            .request_with_deadline(request, self.deadline)
            .await
    }
}

#[async_trait::async_trait]
impl DocumentSource for ApiClient {
    async fn get_page(&self, id: &PageId) -> Result<PageHandle, AppError> {
        let value = self
            .send(ApiRequest::get(format!("pages/{}", id.to_hyphenated())))
            .await?;
        parser::parse_page_handle(&value)
    }

    async fn create_page(
        &self,
        target: &DataSourceId,
        properties: serde_json::Value,
    ) -> Result<PageHandle, AppError> {
        let body = json!({
            "parent": { "type": "data_source_id", "data_source_id": target.to_hyphenated() },
            "properties": properties,
        });
        let value = self.send(ApiRequest::post("pages", body)).await?;
        parser::parse_page_handle(&value)
    }

    async fn update_page_properties(
        &self,
        id: &PageId,
        properties: serde_json::Value,
    ) -> Result<PageHandle, AppError> {
        let body = json!({ "properties": properties });
        let value = self
            .send(ApiRequest::patch(
                format!("pages/{}/properties", id.to_hyphenated()),
                body,
            ))
            .await?;
        parser::parse_page_handle(&value)
    }

    async fn get_database(&self, id: &DatabaseId) -> Result<Database, AppError> {
        let value = self
            .send(ApiRequest::get(format!(
                "databases/{}",
                id.to_hyphenated()
            )))
            .await?;
        parser::parse_database(&value)
    }

    async fn query_data_source(
        &self,
        target: &DataSourceId,
        query: QueryRequest,
    ) -> Result<Paginated<PageHandle>, AppError> {
        let value = self
            .send(ApiRequest::post(
                format!("databases/{}/query", target.to_hyphenated()),
                query.into_body(),
            ))
            .await?;

        let results = value["results"]
            .as_array()
            .ok_or_else(|| {
                AppError::MalformedResponse("query response without results".to_string())
            })?
            .iter()
            .map(parser::parse_page_handle)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            results,
            next_cursor: value["next_cursor"].as_str().map(str::to_string),
            has_more: value["has_more"].as_bool().unwrap_or(false),
        })
    }

    async fn list_children(
        &self,
        parent: &BlockId,
        cursor: Option<String>,
    ) -> Result<Paginated<Block>, AppError> {
        let mut path = format!(
            "blocks/{}/children?page_size={}",
            parent.to_hyphenated(),
            API_PAGE_SIZE
        );
        if let Some(cursor) = cursor {
            path.push_str(&format!("&start_cursor={}", cursor));
        }

        let value = self.send(ApiRequest::get(path)).await?;
        parser::parse_block_page(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_body_carries_only_what_was_set() {
        let body = QueryRequest::default().into_body();
        assert_eq!(body["page_size"], 100);
        assert!(body.get("filter").is_none());
        assert!(body.get("start_cursor").is_none());

        let body = QueryRequest {
            filter: Some(json!({"property": "Status", "select": {"equals": "Open"}})),
            sorts: None,
            start_cursor: Some("c9".to_string()),
        }
        .into_body();
        assert_eq!(body["filter"]["property"], "Status");
        assert_eq!(body["start_cursor"], "c9");
    }
}
