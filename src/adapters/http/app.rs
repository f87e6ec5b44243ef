//! Application router.
//!
//! ```text
//! /api/health
//! /api/documents      → documents::document_routes
//! /api/proposals      → proposals::proposal_routes
//! /api/notifications  → notifications::notification_routes
//! /api/live           → websocket::live_routes
//! ```

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use http::{HeaderValue, Method};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::websocket::{live_routes, LiveState};
use crate::application::{
    ApproveProposalHandler, CreateDocumentHandler, DeleteNotificationsHandler, DocumentLocks,
    GetDocumentHandler, GetProposalHandler, ListDocumentsHandler, ListNotificationsHandler,
    ListProposalsHandler, MarkReadHandler, NotificationDispatcher, RejectProposalHandler,
    SubmitProposalHandler, UnreadCountHandler,
};
use crate::config::{ReviewConfig, ServerConfig};
use crate::domain::diff::DiffEngine;
use crate::ports::{
    ConnectionRegistry, DocumentRepository, NotificationRepository, ProposalRepository,
    SessionValidator, UserDirectory,
};

use super::documents::{document_routes, DocumentHandlers};
use super::middleware::auth_middleware;
use super::notifications::{notification_routes, NotificationHandlers};
use super::proposals::{proposal_routes, ProposalHandlers};

/// Adapter set the router is built from.
#[derive(Clone)]
pub struct AppPorts {
    pub documents: Arc<dyn DocumentRepository>,
    pub proposals: Arc<dyn ProposalRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub directory: Arc<dyn UserDirectory>,
    pub registry: Arc<dyn ConnectionRegistry>,
    pub validator: Arc<dyn SessionValidator>,
}

impl AppPorts {
    pub fn dispatcher(&self, review: &ReviewConfig) -> NotificationDispatcher {
        NotificationDispatcher::new(
            self.notifications.clone(),
            self.registry.clone(),
            self.directory.clone(),
        )
        .with_fanout_concurrency(review.fanout_concurrency)
    }
}

pub fn build_router(ports: &AppPorts, review: &ReviewConfig, server: &ServerConfig) -> Router {
    let dispatcher = ports.dispatcher(review);
    let locks = Arc::new(DocumentLocks::new());

    let documents = DocumentHandlers::new(
        Arc::new(CreateDocumentHandler::new(
            ports.documents.clone(),
            ports.directory.clone(),
        )),
        Arc::new(GetDocumentHandler::new(
            ports.documents.clone(),
            ports.directory.clone(),
        )),
        Arc::new(ListDocumentsHandler::new(
            ports.documents.clone(),
            ports.directory.clone(),
        )),
    );

    let proposals = ProposalHandlers::new(
        Arc::new(SubmitProposalHandler::new(
            ports.documents.clone(),
            ports.proposals.clone(),
            ports.directory.clone(),
            locks.clone(),
            dispatcher.clone(),
        )),
        Arc::new(ApproveProposalHandler::new(
            ports.documents.clone(),
            ports.proposals.clone(),
            ports.directory.clone(),
            locks.clone(),
            dispatcher.clone(),
        )),
        Arc::new(RejectProposalHandler::new(
            ports.documents.clone(),
            ports.proposals.clone(),
            ports.directory.clone(),
            locks,
            dispatcher.clone(),
        )),
        Arc::new(GetProposalHandler::new(
            ports.proposals.clone(),
            ports.directory.clone(),
            DiffEngine::new(review.lcs_line_limit),
        )),
        Arc::new(ListProposalsHandler::new(
            ports.proposals.clone(),
            ports.directory.clone(),
        )),
    );

    let notifications = NotificationHandlers::new(
        Arc::new(
            ListNotificationsHandler::new(ports.notifications.clone())
                .with_page_sizes(review.default_page_size, review.max_page_size),
        ),
        Arc::new(UnreadCountHandler::new(ports.notifications.clone())),
        Arc::new(MarkReadHandler::new(
            ports.notifications.clone(),
            dispatcher.clone(),
        )),
        Arc::new(DeleteNotificationsHandler::new(
            ports.notifications.clone(),
            dispatcher,
        )),
    );

    let live = LiveState::new(
        ports.registry.clone(),
        ports.validator.clone(),
        review.live_channel_capacity,
    );

    let api = Router::new()
        .route("/health", get(health))
        .nest("/documents", document_routes(documents))
        .nest("/proposals", proposal_routes(proposals))
        .nest("/notifications", notification_routes(notifications))
        .nest("/live", live_routes(live))
        .layer(from_fn_with_state(ports.validator.clone(), auth_middleware));

    Router::new().nest("/api", api).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            // Path only: the live channel carries its credential in the query.
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(server.request_timeout()))
            .layer(cors_layer(&server.cors_origins_list())),
    )
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") || origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::memory::{
        InMemoryDocumentRepository, InMemoryNotificationRepository, InMemoryProposalRepository,
        InMemoryUserDirectory,
    };
    use crate::adapters::websocket::InMemoryConnectionRegistry;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn ports() -> AppPorts {
        AppPorts {
            documents: Arc::new(InMemoryDocumentRepository::new()),
            proposals: Arc::new(InMemoryProposalRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            directory: Arc::new(InMemoryUserDirectory::new()),
            registry: Arc::new(InMemoryConnectionRegistry::default()),
            validator: Arc::new(MockSessionValidator::new()),
        }
    }

    fn router() -> Router {
        build_router(&ports(), &ReviewConfig::default(), &ServerConfig::default())
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = router()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn api_requires_credentials() {
        let response = router()
            .oneshot(Request::builder().uri("/api/documents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejected_bearer_token_is_unauthorized() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Authorization", "Bearer nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn wildcard_or_empty_origins_allow_any() {
        let _ = cors_layer(&[]);
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["http://localhost:5173".to_string(), "bad\norigin".to_string()]);
    }
}
