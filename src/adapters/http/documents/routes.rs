//! HTTP routes for document endpoints.

use axum::{routing::get, Router};

use super::handlers::{create_document, get_document, list_documents, DocumentHandlers};

pub fn document_routes(handlers: DocumentHandlers) -> Router {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route("/:id", get(get_document))
        .with_state(handlers)
}
