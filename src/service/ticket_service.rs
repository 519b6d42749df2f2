// service/ticket_service.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::store::MarketplaceStore,
    dtos::supportdtos::{CreateTicketDto, TechnicianResponseDto},
    models::supportmodel::*,
    service::{
        error::ServiceError,
        notification_service::{self, NotificationService},
        session::Session,
    },
    utils::pagination::page_window,
};

#[derive(Debug, Clone)]
pub struct TicketService {
    store: Arc<dyn MarketplaceStore>,
    notification_service: Arc<NotificationService>,
    response_window: Duration,
}

impl TicketService {
    pub fn new(
        store: Arc<dyn MarketplaceStore>,
        notification_service: Arc<NotificationService>,
        response_window: Duration,
    ) -> Self {
        Self {
            store,
            notification_service,
            response_window,
        }
    }

    pub async fn create_ticket(
        &self,
        session: &Session,
        body: CreateTicketDto,
    ) -> Result<SupportTicket, ServiceError> {
        let reporter = session.require_user()?;
        let reporter_role = reporter.role.reporter_role().ok_or_else(|| {
            ServiceError::Validation("Admins cannot file support tickets".to_string())
        })?;

        let body = CreateTicketDto {
            subject: body.subject.trim().to_string(),
            description: body.description.trim().to_string(),
            ..body
        };
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let now = Utc::now();
        let (status, response_deadline) = match body.ticket_type {
            TicketType::Dispute => {
                match body.against_id {
                    None => {
                        return Err(ServiceError::Validation(
                            "A dispute must name the party it is filed against".to_string(),
                        ))
                    }
                    Some(against) if against == reporter.id => {
                        return Err(ServiceError::Validation(
                            "You cannot file a dispute against yourself".to_string(),
                        ))
                    }
                    Some(_) => {}
                }
                (TicketStatus::AwaitingResponse, Some(now + self.response_window))
            }
            TicketType::Support => {
                if !body.evidence_photos.is_empty() {
                    return Err(ServiceError::Validation(
                        "Evidence photos can only be attached to disputes".to_string(),
                    ));
                }
                (TicketStatus::Open, None)
            }
        };

        let ticket = self
            .store
            .create_support_ticket(NewSupportTicket {
                reporter_id: reporter.id,
                reporter_role,
                against_id: body.against_id,
                service_request_id: body.service_request_id,
                ticket_type: body.ticket_type,
                subject: body.subject,
                description: body.description,
                evidence_photos: body.evidence_photos,
                response_deadline,
                status,
                created_at: now,
            })
            .await?;

        tracing::info!(
            "Ticket {} filed by {} ({:?}), status {}",
            ticket.id,
            ticket.reporter_id,
            ticket.ticket_type,
            ticket.status.to_str()
        );

        if let (TicketType::Dispute, Some(accused)) = (ticket.ticket_type, ticket.against_id) {
            let report = self
                .notification_service
                .send(vec![notification_service::dispute_filed(&ticket, accused)])
                .await;
            if report.deferred > 0 {
                tracing::warn!("Notice of dispute {} to {} left to the outbox worker", ticket.id, accused);
            }
        }

        Ok(ticket)
    }

    /// Records the accused party's one and only defence.
    pub async fn submit_response(
        &self,
        session: &Session,
        ticket_id: Uuid,
        body: TechnicianResponseDto,
    ) -> Result<SupportTicket, ServiceError> {
        let user = session.require_user()?;

        let ticket = self
            .store
            .get_support_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        if !ticket.is_dispute() {
            return Err(ServiceError::NotADispute(ticket_id));
        }

        if ticket.against_id != Some(user.id) {
            return Err(ServiceError::UnauthorizedTicketAccess(user.id, ticket_id));
        }

        if ticket.technician_response.is_some() {
            return Err(ServiceError::ResponseAlreadySubmitted(ticket_id));
        }

        let response = body.response.trim().to_string();
        if response.is_empty() {
            return Err(ServiceError::Validation("Response cannot be empty".to_string()));
        }

        if ticket.deadline_expired_without_response(Utc::now()) {
            tracing::info!("Late response on ticket {} accepted after the deadline", ticket_id);
        }

        // the guarded write catches a concurrent responder that got in first
        let updated = self
            .store
            .record_technician_response(ticket_id, response)
            .await?
            .ok_or(ServiceError::ResponseAlreadySubmitted(ticket_id))?;

        tracing::info!("Ticket {} moved to under_review after response from {}", ticket_id, user.id);

        Ok(updated)
    }

    pub async fn get_ticket(
        &self,
        session: &Session,
        ticket_id: Uuid,
    ) -> Result<SupportTicketView, ServiceError> {
        let user = session.require_user()?;

        let ticket = self
            .store
            .get_support_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        if !user.is_admin() && !ticket.involves(user.id) {
            return Err(ServiceError::UnauthorizedTicketAccess(user.id, ticket_id));
        }

        let deadline_expired_without_response = ticket.deadline_expired_without_response(Utc::now());
        Ok(SupportTicketView {
            ticket,
            deadline_expired_without_response,
        })
    }

    pub async fn list_tickets(
        &self,
        session: &Session,
        params: SupportQueryParams,
    ) -> Result<Vec<SupportTicket>, ServiceError> {
        session.require_admin()?;

        let (limit, offset) = page_window(params.page, params.limit, 20);

        Ok(self
            .store
            .get_support_tickets(limit, offset, params.status)
            .await?)
    }

    pub async fn my_tickets(&self, session: &Session) -> Result<Vec<SupportTicket>, ServiceError> {
        let user = session.require_user()?;
        Ok(self.store.get_user_support_tickets(user.id).await?)
    }
}
