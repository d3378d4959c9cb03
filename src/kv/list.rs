//! Exhaustive keyspace enumeration: follow the backend cursor until it
//! reports the list complete.

use crate::error::ApiError;
use crate::store::KvStore;

/// Ceiling on pages fetched in one enumeration, so a runaway backend turns
/// into an error instead of unbounded blocking.
pub const MAX_LIST_PAGES: u32 = 10_000;

/// Collect every key name in the namespace, fully materialized. The loop
/// passes each page's cursor to the next call and stops only on the explicit
/// `list_complete` flag: an empty page or an absent cursor mid-stream means
/// "keep going", not "done".
pub async fn list_all_keys(
    store: &dyn KvStore,
    namespace: &str,
) -> Result<Vec<String>, ApiError> {
    list_all_keys_bounded(store, namespace, MAX_LIST_PAGES).await
}

pub async fn list_all_keys_bounded(
    store: &dyn KvStore,
    namespace: &str,
    max_pages: u32,
) -> Result<Vec<String>, ApiError> {
    let mut keys = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;
    loop {
        let page = store
            .list(cursor.as_deref())
            .await
            .map_err(|e| ApiError::Backend(format!("{}: {}", namespace, e)))?;
        keys.extend(page.keys);
        if page.list_complete {
            break;
        }
        pages += 1;
        if pages >= max_pages {
            return Err(ApiError::Backend(format!(
                "{}: key listing exceeded {} pages",
                namespace, max_pages
            )));
        }
        cursor = page.cursor;
    }
    tracing::debug!(namespace = %namespace, count = keys.len(), "kv list complete");
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyPage, KvStore, StoreError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed script of pages and records the cursors it was handed.
    struct PagedKv {
        pages: Vec<KeyPage>,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl PagedKv {
        fn new(pages: Vec<KeyPage>) -> Self {
            PagedKv {
                pages,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl KvStore for PagedKv {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            unimplemented!()
        }
        async fn get_many(&self, _keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
            unimplemented!()
        }
        async fn put(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            unimplemented!()
        }
        async fn list(&self, cursor: Option<&str>) -> Result<KeyPage, StoreError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(cursor.map(String::from));
            let idx = calls.len() - 1;
            Ok(self.pages[idx % self.pages.len()].clone())
        }
    }

    fn page(keys: &[&str], cursor: Option<&str>, list_complete: bool) -> KeyPage {
        KeyPage {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            cursor: cursor.map(String::from),
            list_complete,
        }
    }

    #[tokio::test]
    async fn follows_cursor_until_list_complete() {
        let kv = PagedKv::new(vec![
            page(&["k1", "k2"], Some("c1"), false),
            page(&[], Some("c2"), false),
            page(&["k3"], None, true),
        ]);
        let keys = list_all_keys(&kv, "NS").await.unwrap();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert_eq!(kv.call_count(), 3);
        assert_eq!(
            *kv.calls.lock().unwrap(),
            vec![None, Some("c1".into()), Some("c2".into())]
        );
    }

    #[tokio::test]
    async fn empty_page_without_flag_does_not_terminate() {
        let kv = PagedKv::new(vec![
            page(&[], Some("c1"), false),
            page(&["only"], None, true),
        ]);
        let keys = list_all_keys(&kv, "NS").await.unwrap();
        assert_eq!(keys, vec!["only"]);
        assert_eq!(kv.call_count(), 2);
    }

    #[tokio::test]
    async fn single_complete_page_takes_one_call() {
        let kv = PagedKv::new(vec![page(&["a"], None, true)]);
        let keys = list_all_keys(&kv, "NS").await.unwrap();
        assert_eq!(keys, vec!["a"]);
        assert_eq!(kv.call_count(), 1);
    }

    #[tokio::test]
    async fn page_ceiling_stops_runaway_enumeration() {
        // Never sets list_complete; the bounded loop must give up.
        let kv = PagedKv::new(vec![page(&["k"], Some("c"), false)]);
        let err = list_all_keys_bounded(&kv, "NS", 3).await.unwrap_err();
        assert!(matches!(err, ApiError::Backend(_)));
        assert_eq!(kv.call_count(), 3);
    }
}
