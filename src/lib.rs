//! storegate: generic HTTP-to-storage gateway.
//!
//! One uniform URL/verb grammar (`/rest/{KV|DB}/...`) translated into
//! parameterized SQL against a relational store and batch/enumeration calls
//! against named key-value namespaces, with no per-table or per-namespace
//! code.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ident;
pub mod kv;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::ApiError;
pub use routes::rest_routes;
pub use state::AppState;
pub use store::{
    ensure_kv_table, KeyPage, KvRegistry, KvStore, MemoryKv, PgKvStore, PgStore,
    RelationalStore, StoreError,
};
