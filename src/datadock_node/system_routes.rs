use super::http_helpers::{with_node, ApiResponse};
use super::http_server::AppState;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Service banner with the crate version and a map of available endpoints.
pub async fn root_info(_state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(
        "JSON document API is running",
        Some(json!({
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "GET /files": "List all JSON files",
                "GET /files/{filename}": "Get file content",
                "GET /files/{filename}/schema": "Infer a file's schema",
                "POST /files": "Create a new file",
                "PUT /files/{filename}": "Update a file",
                "DELETE /files/{filename}": "Delete a file",
                "POST /upload": "Upload a JSON file",
                "POST /validate": "Validate JSON data",
                "POST /transform": "Transform a stored file",
                "GET /stats": "Store statistics",
                "GET /search": "Search across files",
                "GET /health": "Health check",
            },
        })),
    ))
}

/// Liveness check.
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Aggregate statistics over the document store.
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    with_node(state, |node| {
        let stats = node.stats()?;
        Ok((
            StatusCode::OK,
            ApiResponse::success(
                "Statistics retrieved successfully",
                Some(serde_json::to_value(stats)?),
            ),
        ))
    })
}
