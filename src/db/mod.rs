//! Data-store layer
//!
//! The remote relational store is reached through the [`DataStore`] trait:
//! select / insert / update / delete over named tables, with equality
//! filters and ordering. Two implementations exist:
//! - `SupabaseClient` (REST, see `crate::supabase`)
//! - [`MemoryStore`] (in-process tables, used by tests and local runs)
//!
//! Typed access per table lives in [`repositories`].

pub mod memory;
pub mod query;
pub mod repositories;

pub use memory::{MemoryStore, StoreCall};
pub use query::{tables, Filter, Operation, Order, Select};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::BackendError;

/// Query interface over named tables
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch rows. When `query.single` is set, exactly one row must match.
    async fn select(&self, query: &Select) -> Result<Vec<Value>, BackendError>;

    /// Insert one or more rows
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), BackendError>;

    /// Set `values` on every row matching `filter`
    async fn update(&self, table: &str, values: Value, filter: &Filter) -> Result<(), BackendError>;

    /// Delete every row matching `filter`
    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), BackendError>;
}

pub type DynDataStore = Arc<dyn DataStore>;

/// Message reported when a single-row select does not match exactly one row
pub(crate) fn single_row_error(count: usize) -> BackendError {
    BackendError::new(format!(
        "JSON object requested, multiple (or no) rows returned ({} rows)",
        count
    ))
    .with_code("PGRST116")
}
