//! Key-value translation layer: validated batch reads/writes and full
//! keyspace enumeration.

pub mod batch;
pub mod list;
