use super::http_helpers::{error_response, with_node, ApiResponse};
use super::http_server::AppState;
use actix_multipart::Multipart;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

/// Request body for creating a document.
#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub filename: String,
    pub data: Value,
}

/// List all stored documents with metadata.
pub async fn list_files(state: web::Data<AppState>) -> impl Responder {
    with_node(state, |node| {
        let files = node.list_files()?;
        let total = files.len();
        Ok((
            StatusCode::OK,
            ApiResponse::success(
                format!("Found {} JSON files", total),
                Some(json!({ "files": files, "total": total })),
            ),
        ))
    })
}

/// Return a document's raw content.
pub async fn get_file(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let name = path.into_inner();
    with_node(state, move |node| Ok((StatusCode::OK, node.get_file(&name)?)))
}

/// Create a new document from a `{filename, data}` body.
pub async fn create_file(
    request: web::Json<CreateFileRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let CreateFileRequest { filename, data } = request.into_inner();
    info!("Received request to create file {}", filename);
    with_node(state, move |node| {
        node.create_file(&filename, &data)?;
        Ok((
            StatusCode::CREATED,
            ApiResponse::success(
                format!("File {} created successfully", filename),
                Some(json!({ "filename": filename })),
            ),
        ))
    })
}

/// Replace an existing document's content.
pub async fn update_file(
    path: web::Path<String>,
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> impl Responder {
    let name = path.into_inner();
    let data = body.into_inner();
    info!("Received request to update file {}", name);
    with_node(state, move |node| {
        node.update_file(&name, &data)?;
        Ok((
            StatusCode::OK,
            ApiResponse::success(
                format!("File {} updated successfully", name),
                Some(json!({ "filename": name })),
            ),
        ))
    })
}

/// Delete a document.
pub async fn delete_file(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let name = path.into_inner();
    info!("Received request to delete file {}", name);
    with_node(state, move |node| {
        node.delete_file(&name)?;
        Ok((
            StatusCode::OK,
            ApiResponse::success(format!("File {} deleted successfully", name), None),
        ))
    })
}

/// Infer and return the schema of a stored document.
pub async fn get_file_schema(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let name = path.into_inner();
    with_node(state, move |node| {
        let schema = node.infer_file_schema(&name)?;
        Ok((
            StatusCode::OK,
            ApiResponse::success(
                format!("Schema inferred for {}", name),
                Some(json!({ "filename": name, "schema": schema })),
            ),
        ))
    })
}

/// Accept a multipart upload and store its first file part as a document.
///
/// The part's filename must end in `.json` and its bytes must parse as
/// JSON; an existing document with the same name is overwritten.
pub async fn upload_file(mut payload: Multipart, state: web::Data<AppState>) -> impl Responder {
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return HttpResponse::BadRequest()
                    .json(json!({ "error": format!("Invalid multipart payload: {}", e) }))
            }
        };
        let filename = match field.content_disposition().get_filename() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if !filename.ends_with(".json") {
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Only JSON files are allowed" }));
        }

        let mut body = web::BytesMut::new();
        loop {
            match field.try_next().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    return HttpResponse::BadRequest()
                        .json(json!({ "error": format!("Failed to read upload: {}", e) }))
                }
            }
        }

        info!("Received upload of {} ({} bytes)", filename, body.len());
        return match state.node.upload_file(&filename, &body) {
            Ok(size) => HttpResponse::Ok().json(ApiResponse::success(
                format!("File {} uploaded successfully", filename),
                Some(json!({ "filename": filename, "size": size })),
            )),
            Err(e) => error_response(&e),
        };
    }
    HttpResponse::BadRequest().json(json!({ "error": "No file part in upload" }))
}
