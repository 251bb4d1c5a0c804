// src/lib.rs
//! notiondown library — converts remote block trees into portable
//! markdown and plaintext.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ApiErrorCode`, `ValidationError`
//! - **Configuration** — `ConverterConfig`
//! - **Domain model** — `Block`, `BlockPayload`, `MaterializedNode`,
//!   `Database`, `PageHandle`
//! - **Domain types** — `PageId`, `BlockId`, `DataSourceId`,
//!   `AccessToken`, `RichTextSpan`, etc.
//! - **API client** — `ApiClient`, `Transport`, `DocumentSource`,
//!   pagination and resolution helpers
//! - **Conversion** — `convert_page`, `BlockConverter`, `to_plaintext`

mod api;
mod config;
mod constants;
mod convert;
mod error;
mod model;
mod types;

// --- Error Handling ---
pub use crate::error::{ApiErrorCode, AppError, ValidationError};

// --- Configuration ---
pub use crate::config::{CommandLineInput, ConverterConfig, DialectArg};

// --- Domain Model ---
pub use crate::model::{Block, BlockPayload, DataSourceRef, Database, MaterializedNode, PageHandle};

// --- Domain Types ---
pub use crate::types::{
    AccessToken, Annotations, BlockId, CredentialStore, DataSourceId, DatabaseId, Id,
    InMemoryCredentialStore, Link, PageId, RichTextSpan, SpanKind, UserKey,
};

// --- API Client ---
pub use crate::api::endpoints::{ApiClient, QueryRequest};
pub use crate::api::materialize::TreeMaterializer;
pub use crate::api::pagination::{fetch_all, page_stream, Paginated};
pub use crate::api::parser::{
    parse_block, parse_block_page, parse_database, parse_page_handle, parse_rich_text,
};
pub use crate::api::resolve::{resolve_write_target, WriteTarget};
pub use crate::api::retry::{RetryDecision, RetryPolicy, Sleeper, TokioSleeper};
pub use crate::api::transport::{
    ApiRequest, HttpSend, Method, RawResponse, Transport, TransportFault,
};
pub use crate::api::DocumentSource;

// --- Conversion ---
pub use crate::convert::{
    convert_page, to_plaintext, BlockConverter, ConvertedDocument, MarkdownDialect,
    INCOMPLETE_SUBTREE_MARKER,
};

// --- Constants ---
pub use crate::constants::{API_PAGE_SIZE, DEFAULT_RETRY_BUDGET, MAX_FETCH_DEPTH};
