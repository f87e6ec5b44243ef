//! HTTP routes for notification endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    clear_notifications, delete_notification, list_notifications, mark_one_read, mark_read,
    unread_count, NotificationHandlers,
};

pub fn notification_routes(handlers: NotificationHandlers) -> Router {
    Router::new()
        .route("/", get(list_notifications).delete(clear_notifications))
        .route("/unread", get(unread_count))
        .route("/mark-read", post(mark_read))
        .route("/:id/read", post(mark_one_read))
        .route("/:id", delete(delete_notification))
        .with_state(handlers)
}
