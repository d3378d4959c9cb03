//! Named key-value bindings, resolved dynamically per request.

use crate::store::KvStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Namespace name → store handle, populated once at startup from
/// configuration. An unknown name is a lookup miss, never a panic; callers
/// turn it into a client error.
#[derive(Clone, Default)]
pub struct KvRegistry {
    stores: Arc<HashMap<String, Arc<dyn KvStore>>>,
}

impl KvRegistry {
    pub fn new(stores: HashMap<String, Arc<dyn KvStore>>) -> Self {
        KvRegistry {
            stores: Arc::new(stores),
        }
    }

    pub fn get(&self, namespace: &str) -> Option<Arc<dyn KvStore>> {
        self.stores.get(namespace).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.stores.keys().map(String::as_str).collect()
    }
}
