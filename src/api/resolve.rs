// src/api/resolve.rs
//! Resolving the canonical write/read target.
//!
//! A database may delegate its rows to one or more data sources; writes
//! and queries must address a data source whenever any exist. Resolution
//! soft-fails: if the database can't be fetched right now, the original
//! id is used as-is so writes stay available while resolution metadata
//! is transiently unreachable. Availability over strictness.

use crate::types::{DataSourceId, DatabaseId};
use super::DocumentSource;

/// A caller-supplied target, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteTarget {
    /// Already canonical — resolution returns it unchanged.
    DataSource(DataSourceId),
    /// Needs resolution against the database's data sources.
    Database(DatabaseId),
}

/// Resolves a target to the data source id operations should address.
///
/// Never fails:
/// - a data source target passes through unchanged;
/// - a database with data sources resolves to the **first** in provider
///   order (the provider's order is the only documented tie-break);
/// - a database with none is addressed as itself;
/// - a fetch failure falls back to the original id.
pub async fn resolve_write_target(
    source: &dyn DocumentSource,
    target: &WriteTarget,
) -> DataSourceId {
    let database_id = match target {
        WriteTarget::DataSource(id) => return id.clone(),
        WriteTarget::Database(id) => id,
    };

    match source.get_database(database_id).await {
        Ok(database) => match database.data_sources.first() {
            Some(first) => {
                if database.data_sources.len() > 1 {
                    log::debug!(
                        "Database {} exposes {} data sources; using the first ({})",
                        database_id,
                        database.data_sources.len(),
                        first.id
                    );
                }
                first.id.clone()
            }
            None => database_id.into(),
        },
        Err(error) => {
            log::warn!(
                "Could not resolve data sources for database {} ({}); using the database id directly",
                database_id,
                error
            );
            database_id.into()
        }
    }
}
