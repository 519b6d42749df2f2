pub mod error;
pub mod notification_service;
pub mod outbox;
pub mod session;
pub mod ticket_service;
pub mod verdict_service;

#[cfg(test)]
pub mod testkit;
