//! Route table keyed by (namespace kind, verb). Every mapped pair is an
//! explicit entry; unmapped verbs on known paths get a 405 envelope through
//! per-route method fallbacks, and everything else falls through to a 400
//! usage message.

use crate::error::ApiError;
use crate::handlers::{db, kv};
use crate::state::AppState;
use axum::{
    http::{Method, Uri},
    routing::get,
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

const USAGE: &str = "usage: /rest/{KV|DB}/{resource}[/{id-or-key}]";
const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} {}", method, uri.path()))
}

async fn malformed_path(uri: Uri) -> ApiError {
    ApiError::MalformedPath(format!("{}; {}", uri.path(), USAGE))
}

pub fn rest_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/rest/KV/:namespace",
            get(kv::read_namespace)
                .put(kv::write_namespace)
                .fallback(method_not_allowed),
        )
        .route(
            "/rest/KV/:namespace/:key",
            get(kv::read_key).fallback(method_not_allowed),
        )
        .route(
            "/rest/DB/:table",
            get(db::fetch_rows)
                .post(db::create_row)
                .put(db::reject_missing_id)
                .patch(db::reject_missing_id)
                .delete(db::reject_missing_id)
                .fallback(method_not_allowed),
        )
        .route(
            "/rest/DB/:table/:id",
            get(db::fetch_row)
                .put(db::update_row)
                .patch(db::update_row)
                .delete(db::delete_row)
                .fallback(method_not_allowed),
        )
        .fallback(malformed_path)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .with_state(state)
}
