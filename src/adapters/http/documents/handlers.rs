//! HTTP handlers for document endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_id, ErrorResponse};
use crate::adapters::http::middleware::Caller;
use crate::application::handlers::document::{
    CreateDocumentCommand, CreateDocumentHandler, GetDocumentHandler, GetDocumentQuery,
    ListDocumentsHandler, ListDocumentsQuery,
};
use crate::domain::document::DocumentError;
use crate::domain::foundation::DocumentId;

use super::dto::{
    CreateDocumentRequest, DocumentResponse, DocumentSummaryResponse, ListDocumentsParams,
};

#[derive(Clone)]
pub struct DocumentHandlers {
    create_handler: Arc<CreateDocumentHandler>,
    get_handler: Arc<GetDocumentHandler>,
    list_handler: Arc<ListDocumentsHandler>,
}

impl DocumentHandlers {
    pub fn new(
        create_handler: Arc<CreateDocumentHandler>,
        get_handler: Arc<GetDocumentHandler>,
        list_handler: Arc<ListDocumentsHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            list_handler,
        }
    }
}

/// POST /api/documents
pub async fn create_document(
    State(handlers): State<DocumentHandlers>,
    Caller(metadata): Caller,
    Json(req): Json<CreateDocumentRequest>,
) -> Response {
    let cmd = CreateDocumentCommand {
        title: req.title,
        content: req.content,
    };
    match handlers.create_handler.handle(cmd, metadata).await {
        Ok(doc) => (StatusCode::CREATED, Json(DocumentResponse::from(&doc))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/documents
pub async fn list_documents(
    State(handlers): State<DocumentHandlers>,
    Caller(metadata): Caller,
    Query(params): Query<ListDocumentsParams>,
) -> Response {
    let query = ListDocumentsQuery {
        filter: params.into_filter(),
    };
    match handlers.list_handler.handle(query, metadata).await {
        Ok(docs) => {
            let items: Vec<DocumentSummaryResponse> =
                docs.iter().map(DocumentSummaryResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => handle_document_error(e),
    }
}

/// GET /api/documents/:id
pub async fn get_document(
    State(handlers): State<DocumentHandlers>,
    Caller(metadata): Caller,
    Path(document_id): Path<String>,
) -> Response {
    let Ok(document_id) = document_id.parse::<DocumentId>() else {
        return invalid_id("document");
    };
    match handlers
        .get_handler
        .handle(GetDocumentQuery { document_id }, metadata)
        .await
    {
        Ok(doc) => (StatusCode::OK, Json(DocumentResponse::from(&doc))).into_response(),
        Err(e) => handle_document_error(e),
    }
}

fn handle_document_error(error: DocumentError) -> Response {
    let code = error.code();
    let body = match &error {
        DocumentError::ValidationFailed { field, .. } => ErrorResponse::new(code, error.message())
            .with_details(serde_json::json!({ "field": field })),
        DocumentError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "document request failed");
            ErrorResponse::new(code, "Internal error")
        }
        _ => ErrorResponse::new(code, error.message()),
    };
    body.into_response_for(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = handle_document_error(DocumentError::not_found(DocumentId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = handle_document_error(DocumentError::Forbidden("no".into()));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = handle_document_error(DocumentError::validation("title", "empty"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response = handle_document_error(DocumentError::Infrastructure("db down".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
