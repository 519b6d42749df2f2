// src/models/supportmodel.rs
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    AwaitingResponse,
    UnderReview,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn to_str(&self) -> &str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::AwaitingResponse => "awaiting_response",
            TicketStatus::UnderReview => "under_review",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "ticket_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Support,
    Dispute,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reporter_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReporterRole {
    Client,
    Technician,
    Vendor,
    Delivery,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "ticket_verdict", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    TechnicianFault,
    ClientMisuse,
    Partial,
}

impl Verdict {
    /// Label shown to both parties when the verdict is announced.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::TechnicianFault => "Technician's fault",
            Verdict::ClientMisuse => "Client misuse",
            Verdict::Partial => "Partial responsibility",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct SupportTicket {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reporter_role: ReporterRole,
    pub against_id: Option<Uuid>,
    pub service_request_id: Option<Uuid>,
    pub ticket_type: TicketType,
    pub subject: String,
    pub description: String,
    pub evidence_photos: Vec<String>,
    pub technician_response: Option<String>,
    pub response_deadline: Option<DateTime<Utc>>,
    pub status: TicketStatus,
    pub verdict: Option<Verdict>,
    pub verdict_notes: Option<String>,
    pub admin_notes: Option<String>,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupportTicket {
    pub fn is_dispute(&self) -> bool {
        self.ticket_type == TicketType::Dispute
    }

    /// Deadlines are advisory: nothing closes a ticket when one passes, the
    /// admin view just flags it.
    pub fn deadline_expired_without_response(&self, now: DateTime<Utc>) -> bool {
        match self.response_deadline {
            Some(deadline) => self.technician_response.is_none() && now > deadline,
            None => false,
        }
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.reporter_id == user_id || self.against_id == Some(user_id)
    }
}

/// Row to insert for a freshly filed ticket.
#[derive(Debug, Clone)]
pub struct NewSupportTicket {
    pub reporter_id: Uuid,
    pub reporter_role: ReporterRole,
    pub against_id: Option<Uuid>,
    pub service_request_id: Option<Uuid>,
    pub ticket_type: TicketType,
    pub subject: String,
    pub description: String,
    pub evidence_photos: Vec<String>,
    pub response_deadline: Option<DateTime<Utc>>,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Admin-side patch. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TicketAdminPatch {
    pub status: Option<TicketStatus>,
    pub admin_notes: Option<String>,
    pub resolution: Option<String>,
    pub verdict: Option<Verdict>,
    pub verdict_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SupportTicketView {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub deadline_expired_without_response: bool,
}

#[derive(Debug, Deserialize)]
pub struct SupportQueryParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
    pub status: Option<TicketStatus>,
}
