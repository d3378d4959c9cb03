//! Env-var settings with defaults. The KV namespace list decides which
//! bindings the registry exposes; everything else is a client error at
//! request time.

const DEFAULT_KV_PAGE_SIZE: i64 = 1000;

pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    /// Comma-separated namespace names, e.g. `CACHE,SESSIONS`.
    pub kv_namespaces: Vec<String>,
    pub kv_page_size: i64,
}

impl Settings {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/storegate".into());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let kv_namespaces = std::env::var("KV_NAMESPACES")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        let kv_page_size = std::env::var("KV_LIST_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_KV_PAGE_SIZE);
        Settings {
            database_url,
            bind_addr,
            kv_namespaces,
            kv_page_size,
        }
    }
}
