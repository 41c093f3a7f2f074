use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::http_server::AppState;
use crate::{
    datadock_node::DataDockNode,
    error::{DataDockError, DataDockResult},
};

/// Standard success envelope returned by most endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Execute a closure against the shared node and return standardized JSON.
///
/// The closure picks the success status and body; errors are mapped to
/// their HTTP status with an `{"error": ...}` body.
pub fn with_node<T, F>(state: web::Data<AppState>, func: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&DataDockNode) -> DataDockResult<(StatusCode, T)>,
{
    match func(&state.node) {
        Ok((status, body)) => HttpResponse::build(status).json(body),
        Err(e) => error_response(&e),
    }
}

/// Map an error to its HTTP response.
pub fn error_response(error: &DataDockError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        log::error!("{}", error);
    } else {
        log::warn!("{}", error);
    }
    HttpResponse::build(status).json(json!({ "error": error.to_string() }))
}

fn status_for(error: &DataDockError) -> StatusCode {
    match error {
        DataDockError::NotFound(_) => StatusCode::NOT_FOUND,
        DataDockError::Conflict(_) => StatusCode::CONFLICT,
        DataDockError::InvalidInput(_)
        | DataDockError::UnsupportedOperation(_)
        | DataDockError::TypeMismatch(_) => StatusCode::BAD_REQUEST,
        DataDockError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
