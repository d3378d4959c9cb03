//! Demo gateway: PostgreSQL-backed relational store plus KV namespaces from
//! the `KV_NAMESPACES` env list, all mounted under /rest.

use std::collections::HashMap;
use std::sync::Arc;
use storegate::{
    ensure_kv_table, rest_routes, AppState, KvRegistry, KvStore, PgKvStore, PgStore, Settings,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("storegate=debug".parse()?))
        .init();

    let settings = Settings::from_env();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;
    ensure_kv_table(&pool).await?;

    let mut namespaces: HashMap<String, Arc<dyn KvStore>> = HashMap::new();
    for name in &settings.kv_namespaces {
        namespaces.insert(
            name.clone(),
            Arc::new(PgKvStore::new(pool.clone(), name.clone(), settings.kv_page_size)),
        );
    }
    tracing::info!(namespaces = ?settings.kv_namespaces, "kv registry");

    let state = AppState {
        db: Arc::new(PgStore::new(pool)),
        kv: KvRegistry::new(namespaces),
    };
    let app = rest_routes(state);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
