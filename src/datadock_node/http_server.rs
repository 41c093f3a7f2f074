use crate::datadock_node::{file_routes, operation_routes, system_routes, DataDockNode};
use crate::error::DataDockResult;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer as ActixHttpServer};
use log::info;
use std::sync::Arc;

/// HTTP server exposing a node's document store as a REST API.
///
/// Serves document CRUD, uploads, schema inference, validation,
/// transforms, statistics, and search over flat routes with permissive
/// CORS, so browser front ends can talk to a local node directly.
pub struct DataDockHttpServer {
    node: Arc<DataDockNode>,
    bind_address: String,
}

/// Shared application state for the HTTP server.
pub struct AppState {
    /// The node backing every request
    pub node: Arc<DataDockNode>,
}

impl DataDockHttpServer {
    /// Create a new HTTP server for the given node.
    ///
    /// `bind_address` is the address to bind to (e.g., "127.0.0.1:8000").
    pub fn new(node: DataDockNode, bind_address: &str) -> Self {
        Self {
            node: Arc::new(node),
            bind_address: bind_address.to_string(),
        }
    }

    /// Run the HTTP server until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the address fails or the server stops
    /// abnormally.
    pub async fn run(&self) -> DataDockResult<()> {
        info!("HTTP server running on {}", self.bind_address);

        let app_state = web::Data::new(AppState {
            node: self.node.clone(),
        });

        let server = ActixHttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(app_state.clone())
                // Service endpoints
                .route("/", web::get().to(system_routes::root_info))
                .route("/health", web::get().to(system_routes::health_check))
                .route("/stats", web::get().to(system_routes::get_stats))
                // File endpoints
                .route("/files", web::get().to(file_routes::list_files))
                .route("/files", web::post().to(file_routes::create_file))
                .route("/files/{name}", web::get().to(file_routes::get_file))
                .route("/files/{name}", web::put().to(file_routes::update_file))
                .route("/files/{name}", web::delete().to(file_routes::delete_file))
                .route(
                    "/files/{name}/schema",
                    web::get().to(file_routes::get_file_schema),
                )
                .route("/upload", web::post().to(file_routes::upload_file))
                // Operation endpoints
                .route("/validate", web::post().to(operation_routes::validate_data))
                .route("/transform", web::post().to(operation_routes::transform_data))
                .route("/search", web::get().to(operation_routes::search_data))
        })
        .bind(&self.bind_address)?
        .run();

        server.await?;

        Ok(())
    }
}
