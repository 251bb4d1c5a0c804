// src/types/mod.rs
//! Domain newtypes shared across the crate.

mod credentials;
mod ids;
mod rich_text;

pub use credentials::{AccessToken, CredentialStore, InMemoryCredentialStore, UserKey};
pub use ids::{BlockId, DataSourceId, DatabaseId, Id, PageId};
pub use rich_text::{Annotations, Link, RichTextSpan, SpanKind};
