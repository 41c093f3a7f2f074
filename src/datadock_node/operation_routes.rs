use super::http_helpers::{with_node, ApiResponse};
use super::http_server::AppState;
use actix_web::{http::StatusCode, web, Responder};
use log::info;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Request body for validating a JSON payload.
#[derive(Debug, Deserialize)]
pub struct ValidationRequest {
    pub data: Value,
    #[serde(default)]
    pub schema_name: Option<String>,
}

/// Request body for transforming one stored document into another.
#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    pub input_filename: String,
    pub output_filename: String,
    pub operation: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Query parameters for document search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub field: Option<String>,
}

/// Validate a JSON payload and report its type and inferred schema.
pub async fn validate_data(
    request: web::Json<ValidationRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let ValidationRequest { data, schema_name } = request.into_inner();
    with_node(state, move |node| {
        let outcome = node.validate(&data, schema_name.as_deref());
        Ok((
            StatusCode::OK,
            ApiResponse::success("Data is valid JSON", Some(serde_json::to_value(outcome)?)),
        ))
    })
}

/// Apply a transform operation to a stored document.
pub async fn transform_data(
    request: web::Json<TransformRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let TransformRequest {
        input_filename,
        output_filename,
        operation,
        parameters,
    } = request.into_inner();
    info!(
        "Received transform request: {} -> {} ({})",
        input_filename, output_filename, operation
    );
    with_node(state, move |node| {
        node.transform_file(&input_filename, &output_filename, &operation, &parameters)?;
        Ok((
            StatusCode::OK,
            ApiResponse::success(
                "Data transformed successfully",
                Some(json!({
                    "input": input_filename,
                    "output": output_filename,
                    "operation": operation,
                })),
            ),
        ))
    })
}

/// Search all stored documents for a query string.
pub async fn search_data(
    params: web::Query<SearchParams>,
    state: web::Data<AppState>,
) -> impl Responder {
    let SearchParams { query, field } = params.into_inner();
    with_node(state, move |node| {
        let results = node.search(&query, field.as_deref())?;
        let total = results.len();
        Ok((
            StatusCode::OK,
            json!({
                "query": query,
                "field": field,
                "results": results,
                "total": total,
            }),
        ))
    })
}
