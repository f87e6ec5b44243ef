//! HTTP adapter for the caller's notification inbox.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ListNotificationsParams, MarkReadRequest, NotificationPageResponse, NotificationResponse,
    UnreadCountResponse, UpdatedCountResponse,
};
pub use handlers::NotificationHandlers;
pub use routes::notification_routes;
