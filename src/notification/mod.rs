pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_service;

pub use notification_dto::{DueNotification, NotificationsResponse, PendingTasksResponse, ALL_DAY};
pub use notification_service::NotificationService;
