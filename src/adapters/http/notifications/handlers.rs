//! HTTP handlers for notification endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_id, ErrorResponse};
use crate::adapters::http::middleware::Caller;
use crate::application::handlers::notification::{
    DeleteNotificationsCommand, DeleteNotificationsHandler, ListNotificationsHandler,
    ListNotificationsQuery, MarkReadCommand, MarkReadHandler, UnreadCountHandler,
};
use crate::domain::foundation::{CommandMetadata, NotificationId};
use crate::domain::notification::{NotificationError, ReadSelection};

use super::dto::{
    ListNotificationsParams, MarkReadRequest, NotificationPageResponse, UnreadCountResponse,
    UpdatedCountResponse,
};

#[derive(Clone)]
pub struct NotificationHandlers {
    list_handler: Arc<ListNotificationsHandler>,
    unread_handler: Arc<UnreadCountHandler>,
    mark_read_handler: Arc<MarkReadHandler>,
    delete_handler: Arc<DeleteNotificationsHandler>,
}

impl NotificationHandlers {
    pub fn new(
        list_handler: Arc<ListNotificationsHandler>,
        unread_handler: Arc<UnreadCountHandler>,
        mark_read_handler: Arc<MarkReadHandler>,
        delete_handler: Arc<DeleteNotificationsHandler>,
    ) -> Self {
        Self {
            list_handler,
            unread_handler,
            mark_read_handler,
            delete_handler,
        }
    }
}

/// GET /api/notifications?page&limit&unread_only
pub async fn list_notifications(
    State(handlers): State<NotificationHandlers>,
    Caller(metadata): Caller,
    Query(params): Query<ListNotificationsParams>,
) -> Response {
    let query = ListNotificationsQuery {
        page: params.page,
        limit: params.limit,
        unread_only: params.unread_only,
    };
    match handlers.list_handler.handle(query, metadata).await {
        Ok(page) => (StatusCode::OK, Json(NotificationPageResponse::from(page))).into_response(),
        Err(e) => handle_notification_error(e),
    }
}

/// GET /api/notifications/unread
pub async fn unread_count(
    State(handlers): State<NotificationHandlers>,
    Caller(metadata): Caller,
) -> Response {
    match handlers.unread_handler.handle(metadata).await {
        Ok(count) => (StatusCode::OK, Json(UnreadCountResponse { count })).into_response(),
        Err(e) => handle_notification_error(e),
    }
}

/// POST /api/notifications/mark-read
pub async fn mark_read(
    State(handlers): State<NotificationHandlers>,
    Caller(metadata): Caller,
    Json(req): Json<MarkReadRequest>,
) -> Response {
    let selection = match req.selection() {
        Ok(selection) => selection,
        Err(message) => return handle_notification_error(NotificationError::validation("ids", message)),
    };
    mark(handlers, metadata, selection).await
}

/// POST /api/notifications/:id/read
pub async fn mark_one_read(
    State(handlers): State<NotificationHandlers>,
    Caller(metadata): Caller,
    Path(notification_id): Path<String>,
) -> Response {
    let Ok(id) = notification_id.parse::<NotificationId>() else {
        return invalid_id("notification");
    };
    mark(handlers, metadata, ReadSelection::Ids(vec![id])).await
}

async fn mark(
    handlers: NotificationHandlers,
    metadata: CommandMetadata,
    selection: ReadSelection,
) -> Response {
    match handlers
        .mark_read_handler
        .handle(MarkReadCommand { selection }, metadata)
        .await
    {
        Ok(updated) => (StatusCode::OK, Json(UpdatedCountResponse { updated })).into_response(),
        Err(e) => handle_notification_error(e),
    }
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(
    State(handlers): State<NotificationHandlers>,
    Caller(metadata): Caller,
    Path(notification_id): Path<String>,
) -> Response {
    let Ok(id) = notification_id.parse::<NotificationId>() else {
        return invalid_id("notification");
    };
    delete(handlers, metadata, DeleteNotificationsCommand::One(id)).await
}

/// DELETE /api/notifications
pub async fn clear_notifications(
    State(handlers): State<NotificationHandlers>,
    Caller(metadata): Caller,
) -> Response {
    delete(handlers, metadata, DeleteNotificationsCommand::All).await
}

async fn delete(
    handlers: NotificationHandlers,
    metadata: CommandMetadata,
    cmd: DeleteNotificationsCommand,
) -> Response {
    match handlers.delete_handler.handle(cmd, metadata).await {
        Ok(updated) => (StatusCode::OK, Json(UpdatedCountResponse { updated })).into_response(),
        Err(e) => handle_notification_error(e),
    }
}

fn handle_notification_error(error: NotificationError) -> Response {
    let code = error.code();
    let body = match &error {
        NotificationError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "notification request failed");
            ErrorResponse::new(code, "Internal error")
        }
        _ => ErrorResponse::new(code, error.message()),
    };
    body.into_response_for(code)
}
