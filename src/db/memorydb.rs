// db/memorydb.rs
//
// In-memory store with the same semantics as the Postgres queries, plus
// failure switches for exercising partial-failure paths.
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::{
    notificationdb::NotificationExt,
    servicerequestdb::ServiceRequestExt,
    supportdb::SupportExt,
    techniciandb::TechnicianExt,
};
use crate::models::{
    marketplacemodel::{ServiceRequestDiscount, TechnicianAccount},
    notificationmodel::{NewNotification, Notification},
    supportmodel::*,
};

#[derive(Debug, Default)]
struct MemoryState {
    tickets: Vec<SupportTicket>,
    notifications: Vec<Notification>,
    technicians: HashMap<Uuid, TechnicianAccount>,
    service_requests: HashMap<Uuid, ServiceRequestDiscount>,
    notification_attempts: usize,
    // user id -> remaining failing attempts (u32::MAX for always)
    failing_recipients: HashMap<Uuid, u32>,
    fail_ticket_writes: bool,
    fail_suspension: bool,
    fail_discount: bool,
    fail_credit_reads: HashSet<Uuid>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

fn injected(what: &str) -> Error {
    Error::Protocol(format!("injected failure: {}", what))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_technician(&self, id: Uuid, credits: i64) {
        self.state.lock().unwrap().technicians.insert(
            id,
            TechnicianAccount {
                id,
                credits,
                suspended: false,
                suspended_at: None,
                suspension_reason: None,
                active: true,
            },
        );
    }

    pub fn add_service_request(&self, id: Uuid) {
        self.state.lock().unwrap().service_requests.insert(
            id,
            ServiceRequestDiscount {
                id,
                admin_discount: None,
                admin_discount_reason: None,
            },
        );
    }

    pub fn technician(&self, id: Uuid) -> Option<TechnicianAccount> {
        self.state.lock().unwrap().technicians.get(&id).cloned()
    }

    pub fn service_request(&self, id: Uuid) -> Option<ServiceRequestDiscount> {
        self.state.lock().unwrap().service_requests.get(&id).cloned()
    }

    pub fn ticket(&self, id: Uuid) -> Option<SupportTicket> {
        self.state.lock().unwrap().tickets.iter().find(|t| t.id == id).cloned()
    }

    pub fn ticket_count(&self) -> usize {
        self.state.lock().unwrap().tickets.len()
    }

    pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
        self.state
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn notification_count(&self) -> usize {
        self.state.lock().unwrap().notifications.len()
    }

    pub fn notification_attempts(&self) -> usize {
        self.state.lock().unwrap().notification_attempts
    }

    /// Every notification insert for `user_id` fails.
    pub fn fail_notifications_for(&self, user_id: Uuid) {
        self.state.lock().unwrap().failing_recipients.insert(user_id, u32::MAX);
    }

    /// The next `times` notification inserts for `user_id` fail.
    pub fn fail_next_notifications_for(&self, user_id: Uuid, times: u32) {
        self.state.lock().unwrap().failing_recipients.insert(user_id, times);
    }

    pub fn fail_ticket_writes(&self) {
        self.state.lock().unwrap().fail_ticket_writes = true;
    }

    pub fn fail_suspension(&self) {
        self.state.lock().unwrap().fail_suspension = true;
    }

    pub fn fail_discount(&self) {
        self.state.lock().unwrap().fail_discount = true;
    }

    pub fn fail_credit_reads(&self, technician_id: Uuid) {
        self.state.lock().unwrap().fail_credit_reads.insert(technician_id);
    }

    /// Overwrites the stored response, bypassing the guard, to simulate a
    /// writer that won a race.
    pub fn force_response(&self, ticket_id: Uuid, response: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == ticket_id) {
            ticket.technician_response = Some(response.to_string());
        }
    }
}

#[async_trait]
impl SupportExt for MemoryStore {
    async fn create_support_ticket(
        &self,
        ticket: NewSupportTicket,
    ) -> Result<SupportTicket, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_ticket_writes {
            return Err(injected("support_tickets insert"));
        }
        let row = SupportTicket {
            id: Uuid::new_v4(),
            reporter_id: ticket.reporter_id,
            reporter_role: ticket.reporter_role,
            against_id: ticket.against_id,
            service_request_id: ticket.service_request_id,
            ticket_type: ticket.ticket_type,
            subject: ticket.subject,
            description: ticket.description,
            evidence_photos: ticket.evidence_photos,
            technician_response: None,
            response_deadline: ticket.response_deadline,
            status: ticket.status,
            verdict: None,
            verdict_notes: None,
            admin_notes: None,
            resolution: None,
            resolved_at: None,
            created_at: ticket.created_at,
            updated_at: ticket.created_at,
        };
        state.tickets.push(row.clone());
        Ok(row)
    }

    async fn get_support_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<SupportTicket>, Error> {
        Ok(self.ticket(ticket_id))
    }

    async fn get_support_tickets(
        &self,
        limit: i64,
        offset: i64,
        status: Option<TicketStatus>,
    ) -> Result<Vec<SupportTicket>, Error> {
        let state = self.state.lock().unwrap();
        let mut tickets: Vec<SupportTicket> = state
            .tickets
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn get_user_support_tickets(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SupportTicket>, Error> {
        let state = self.state.lock().unwrap();
        let mut tickets: Vec<SupportTicket> = state
            .tickets
            .iter()
            .filter(|t| t.involves(user_id))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    async fn record_technician_response(
        &self,
        ticket_id: Uuid,
        response: String,
    ) -> Result<Option<SupportTicket>, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_ticket_writes {
            return Err(injected("support_tickets response"));
        }
        let Some(ticket) = state.tickets.iter_mut().find(|t| {
            t.id == ticket_id && t.is_dispute() && t.technician_response.is_none()
        }) else {
            return Ok(None);
        };
        ticket.technician_response = Some(response);
        ticket.status = TicketStatus::UnderReview;
        ticket.updated_at = Utc::now();
        Ok(Some(ticket.clone()))
    }

    async fn apply_admin_patch(
        &self,
        ticket_id: Uuid,
        patch: TicketAdminPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<SupportTicket>, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_ticket_writes {
            return Err(injected("support_tickets update"));
        }
        let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            ticket.status = status;
        }
        if patch.admin_notes.is_some() {
            ticket.admin_notes = patch.admin_notes;
        }
        if patch.resolution.is_some() {
            ticket.resolution = patch.resolution;
        }
        if patch.verdict.is_some() {
            ticket.verdict = patch.verdict;
        }
        if patch.verdict_notes.is_some() {
            ticket.verdict_notes = patch.verdict_notes;
        }
        if ticket.resolved_at.is_none() && ticket.status == TicketStatus::Resolved {
            ticket.resolved_at = Some(now);
        }
        ticket.updated_at = now;
        Ok(Some(ticket.clone()))
    }
}

#[async_trait]
impl NotificationExt for MemoryStore {
    async fn store_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, Error> {
        let mut state = self.state.lock().unwrap();
        state.notification_attempts += 1;
        if let Some(remaining) = state.failing_recipients.get_mut(&notification.user_id) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(injected("notifications insert"));
            }
        }
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            ticket_id: notification.ticket_id,
            metadata: notification.metadata,
            is_read: false,
            created_at: Utc::now(),
        };
        state.notifications.push(row.clone());
        Ok(row)
    }

    async fn get_user_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, Error> {
        let mut rows = self.notifications_for(user_id);
        rows.reverse();
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Notification>, Error> {
        let mut state = self.state.lock().unwrap();
        let row = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.user_id == user_id);
        Ok(row.map(|n| {
            n.is_read = true;
            n.clone()
        }))
    }
}

#[async_trait]
impl TechnicianExt for MemoryStore {
    async fn get_technician_account(
        &self,
        technician_id: Uuid,
    ) -> Result<Option<TechnicianAccount>, Error> {
        let state = self.state.lock().unwrap();
        if state.fail_credit_reads.contains(&technician_id) {
            return Err(injected("technicians select"));
        }
        Ok(state.technicians.get(&technician_id).cloned())
    }

    async fn suspend_technician(
        &self,
        technician_id: Uuid,
        reason: String,
        suspended_at: DateTime<Utc>,
    ) -> Result<TechnicianAccount, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_suspension {
            return Err(injected("technicians suspension"));
        }
        let account = state
            .technicians
            .get_mut(&technician_id)
            .ok_or(Error::RowNotFound)?;
        account.suspended = true;
        account.suspended_at = Some(suspended_at);
        account.suspension_reason = Some(reason);
        account.active = false;
        Ok(account.clone())
    }

    async fn zero_technician_credits(
        &self,
        technician_id: Uuid,
    ) -> Result<TechnicianAccount, Error> {
        let mut state = self.state.lock().unwrap();
        let account = state
            .technicians
            .get_mut(&technician_id)
            .ok_or(Error::RowNotFound)?;
        account.credits = 0;
        Ok(account.clone())
    }
}

#[async_trait]
impl ServiceRequestExt for MemoryStore {
    async fn apply_admin_discount(
        &self,
        service_request_id: Uuid,
        amount: BigDecimal,
        reason: String,
    ) -> Result<ServiceRequestDiscount, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_discount {
            return Err(injected("service_requests discount"));
        }
        let request = state
            .service_requests
            .get_mut(&service_request_id)
            .ok_or(Error::RowNotFound)?;
        request.admin_discount = Some(amount);
        request.admin_discount_reason = Some(reason);
        Ok(request.clone())
    }
}
