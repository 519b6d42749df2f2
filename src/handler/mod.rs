pub mod notification_handler;
pub mod support_handler;
