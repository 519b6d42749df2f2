// service/notification_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    db::store::MarketplaceStore,
    models::{
        notificationmodel::*,
        supportmodel::{SupportTicket, Verdict},
    },
    service::{
        error::ServiceError,
        outbox::{DeliveryReport, NotificationOutbox},
    },
};

#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn MarketplaceStore>,
    outbox: Arc<NotificationOutbox>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn MarketplaceStore>, outbox: Arc<NotificationOutbox>) -> Self {
        Self { store, outbox }
    }

    /// Delivers the batch inline. Never fails: what could not be delivered
    /// is left to the outbox worker and counted as deferred.
    pub async fn send(&self, batch: Vec<NewNotification>) -> DeliveryReport {
        if batch.is_empty() {
            return DeliveryReport::default();
        }
        self.outbox.dispatch(batch).await
    }

    pub async fn get_user_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.store.get_user_notifications(user_id, limit, offset).await?)
    }

    pub async fn mark_as_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Notification>, ServiceError> {
        Ok(self.store.mark_notification_read(notification_id, user_id).await?)
    }
}

pub fn dispute_filed(ticket: &SupportTicket, accused: Uuid) -> NewNotification {
    let deadline = ticket
        .response_deadline
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "the review date".to_string());

    NewNotification {
        user_id: accused,
        kind: NotificationKind::DisputeFiled,
        title: "A dispute was filed against you".to_string(),
        message: format!(
            "\"{}\": {}. Please respond before {}.",
            ticket.subject, ticket.description, deadline
        ),
        ticket_id: Some(ticket.id),
        metadata: Some(serde_json::json!({
            "reporter_id": ticket.reporter_id,
            "service_request_id": ticket.service_request_id,
            "response_deadline": ticket.response_deadline,
        })),
    }
}

pub fn verdict_announced(
    ticket: &SupportTicket,
    user_id: Uuid,
    verdict: Verdict,
    notes: Option<&str>,
) -> NewNotification {
    let message = match notes {
        Some(notes) => format!("Verdict: {}. {}", verdict.label(), notes),
        None => format!("Verdict: {}", verdict.label()),
    };

    NewNotification {
        user_id,
        kind: NotificationKind::Verdict,
        title: "Dispute verdict".to_string(),
        message,
        ticket_id: Some(ticket.id),
        metadata: Some(serde_json::json!({ "verdict": verdict })),
    }
}

pub fn resolution_recorded(ticket: &SupportTicket, user_id: Uuid, resolution: &str) -> NewNotification {
    NewNotification {
        user_id,
        kind: NotificationKind::Resolution,
        title: "Dispute resolution".to_string(),
        message: format!("Resolution: {}", resolution),
        ticket_id: Some(ticket.id),
        metadata: None,
    }
}

pub fn credits_transferred(ticket: &SupportTicket, credits: i64) -> NewNotification {
    NewNotification {
        user_id: ticket.reporter_id,
        kind: NotificationKind::CreditsTransferred,
        title: "Credits received".to_string(),
        message: format!(
            "You received {} credits as a discount toward your next service.",
            credits
        ),
        ticket_id: Some(ticket.id),
        metadata: Some(serde_json::json!({ "credits": credits })),
    }
}

pub fn account_suspended(ticket: &SupportTicket, technician_id: Uuid, reason: &str) -> NewNotification {
    NewNotification {
        user_id: technician_id,
        kind: NotificationKind::AccountSuspended,
        title: "Account suspended".to_string(),
        message: format!(
            "Your account has been suspended following a dispute verdict: {}",
            reason
        ),
        ticket_id: Some(ticket.id),
        metadata: None,
    }
}

pub fn discount_applied(ticket: &SupportTicket, amount: &BigDecimal) -> NewNotification {
    NewNotification {
        user_id: ticket.reporter_id,
        kind: NotificationKind::DiscountApplied,
        title: "Discount applied".to_string(),
        message: format!(
            "A discount of {} has been applied to your service request.",
            amount
        ),
        ticket_id: Some(ticket.id),
        metadata: Some(serde_json::json!({
            "service_request_id": ticket.service_request_id,
            "amount": amount.to_string(),
        })),
    }
}
