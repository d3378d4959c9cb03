//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct SuccessBody<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct KeysBody {
    pub success: bool,
    pub keys: Vec<String>,
    pub count: u64,
}

#[derive(Serialize)]
pub struct WrittenBody {
    pub success: bool,
    pub message: String,
    pub processed: u64,
    pub keys: Vec<String>,
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessBody<T>>) {
    (
        StatusCode::OK,
        Json(SuccessBody {
            success: true,
            data,
        }),
    )
}

/// 201 with the echoed input payload, for row create.
pub fn success_created(data: Value) -> (StatusCode, Json<SuccessBody<Value>>) {
    (
        StatusCode::CREATED,
        Json(SuccessBody {
            success: true,
            data,
        }),
    )
}

pub fn success_keys(keys: Vec<String>) -> (StatusCode, Json<KeysBody>) {
    let count = keys.len() as u64;
    (
        StatusCode::OK,
        Json(KeysBody {
            success: true,
            keys,
            count,
        }),
    )
}

pub fn success_written(keys: Vec<String>) -> (StatusCode, Json<WrittenBody>) {
    let processed = keys.len() as u64;
    (
        StatusCode::OK,
        Json(WrittenBody {
            success: true,
            message: format!("{} keys written", processed),
            processed,
            keys,
        }),
    )
}
