//! Shared application state for all routes.

use crate::store::{KvRegistry, RelationalStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn RelationalStore>,
    pub kv: KvRegistry,
}
