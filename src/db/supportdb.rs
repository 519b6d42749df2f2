// src/db/supportdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::supportmodel::*;

#[async_trait]
pub trait SupportExt {
    async fn create_support_ticket(
        &self,
        ticket: NewSupportTicket,
    ) -> Result<SupportTicket, Error>;

    async fn get_support_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<SupportTicket>, Error>;

    async fn get_support_tickets(
        &self,
        limit: i64,
        offset: i64,
        status: Option<TicketStatus>,
    ) -> Result<Vec<SupportTicket>, Error>;

    /// Tickets the user filed or that were filed against them.
    async fn get_user_support_tickets(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SupportTicket>, Error>;

    /// Stores the accused party's defence. Returns `None` when the ticket is
    /// not a dispute or already carries a response, leaving the row as is.
    async fn record_technician_response(
        &self,
        ticket_id: Uuid,
        response: String,
    ) -> Result<Option<SupportTicket>, Error>;

    /// Returns `None` when no ticket has the given id.
    async fn apply_admin_patch(
        &self,
        ticket_id: Uuid,
        patch: TicketAdminPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<SupportTicket>, Error>;
}

#[async_trait]
impl SupportExt for DBClient {
    async fn create_support_ticket(
        &self,
        ticket: NewSupportTicket,
    ) -> Result<SupportTicket, Error> {
        sqlx::query_as::<_, SupportTicket>(
            r#"
            INSERT INTO support_tickets
            (reporter_id, reporter_role, against_id, service_request_id, ticket_type,
             subject, description, evidence_photos, response_deadline, status,
             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#
        )
        .bind(ticket.reporter_id)
        .bind(ticket.reporter_role)
        .bind(ticket.against_id)
        .bind(ticket.service_request_id)
        .bind(ticket.ticket_type)
        .bind(ticket.subject)
        .bind(ticket.description)
        .bind(ticket.evidence_photos)
        .bind(ticket.response_deadline)
        .bind(ticket.status)
        .bind(ticket.created_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_support_ticket(
        &self,
        ticket_id: Uuid,
    ) -> Result<Option<SupportTicket>, Error> {
        sqlx::query_as::<_, SupportTicket>(
            r#"
            SELECT * FROM support_tickets
            WHERE id = $1
            "#
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_support_tickets(
        &self,
        limit: i64,
        offset: i64,
        status: Option<TicketStatus>,
    ) -> Result<Vec<SupportTicket>, Error> {
        match status {
            Some(status) => {
                sqlx::query_as::<_, SupportTicket>(
                    r#"
                    SELECT * FROM support_tickets
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#
                )
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, SupportTicket>(
                    r#"
                    SELECT * FROM support_tickets
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn get_user_support_tickets(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SupportTicket>, Error> {
        sqlx::query_as::<_, SupportTicket>(
            r#"
            SELECT * FROM support_tickets
            WHERE reporter_id = $1 OR against_id = $1
            ORDER BY created_at DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn record_technician_response(
        &self,
        ticket_id: Uuid,
        response: String,
    ) -> Result<Option<SupportTicket>, Error> {
        sqlx::query_as::<_, SupportTicket>(
            r#"
            UPDATE support_tickets
            SET technician_response = $2,
                status = 'under_review'::ticket_status,
                updated_at = NOW()
            WHERE id = $1
              AND ticket_type = 'dispute'::ticket_type
              AND technician_response IS NULL
            RETURNING *
            "#
        )
        .bind(ticket_id)
        .bind(response)
        .fetch_optional(&self.pool)
        .await
    }

    async fn apply_admin_patch(
        &self,
        ticket_id: Uuid,
        patch: TicketAdminPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<SupportTicket>, Error> {
        // resolved_at is only ever filled from NULL
        sqlx::query_as::<_, SupportTicket>(
            r#"
            UPDATE support_tickets
            SET status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes),
                resolution = COALESCE($4, resolution),
                verdict = COALESCE($5, verdict),
                verdict_notes = COALESCE($6, verdict_notes),
                resolved_at = CASE
                    WHEN resolved_at IS NULL
                     AND COALESCE($2, status) = 'resolved'::ticket_status
                    THEN $7
                    ELSE resolved_at
                END,
                updated_at = $7
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(ticket_id)
        .bind(patch.status)
        .bind(patch.admin_notes)
        .bind(patch.resolution)
        .bind(patch.verdict)
        .bind(patch.verdict_notes)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }
}
