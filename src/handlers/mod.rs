//! Verb handlers for the two namespace kinds.

pub mod db;
pub mod kv;
