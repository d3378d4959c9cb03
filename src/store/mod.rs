//! Storage collaborator traits. The gateway treats both engines as opaque:
//! prepare/bind/execute for the relational store, get/put/list for key-value.

mod memory;
mod postgres;
mod registry;

pub use memory::MemoryKv;
pub use postgres::{ensure_kv_table, PgKvStore, PgStore};
pub use registry::KvRegistry;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Any error raised by a storage call. The message travels to the caller
/// verbatim inside a 500 envelope.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError(e.to_string())
    }
}

/// Relational store: prepared statements with `$n` placeholders, values bound
/// positionally, rows returned as JSON objects.
#[async_trait]
pub trait RelationalStore: Send + Sync {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, StoreError>;
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError>;
}

/// One page of a keyspace enumeration. `list_complete` — not cursor absence —
/// is the only termination signal; a backend may hand back an empty page with
/// more keys still to come.
#[derive(Debug, Clone)]
pub struct KeyPage {
    pub keys: Vec<String>,
    pub cursor: Option<String>,
    pub list_complete: bool,
}

/// Key-value store. `get_many` results are positionally aligned with the input
/// key order; misses are `None`.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn list(&self, cursor: Option<&str>) -> Result<KeyPage, StoreError>;
}
