// service/verdict_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_traits::Zero;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::store::MarketplaceStore,
    dtos::supportdtos::AdminTicketUpdateDto,
    models::{
        marketplacemodel::TechnicianAccount,
        notificationmodel::NewNotification,
        supportmodel::*,
    },
    service::{
        error::ServiceError,
        notification_service::{self, NotificationService},
        outbox::DeliveryReport,
        session::Session,
    },
};

const DEFAULT_SUSPENSION_REASON: &str = "Suspended following a dispute verdict";
const DEFAULT_DISCOUNT_REASON: &str = "Admin discount applied after dispute review";

#[derive(Debug, Clone, PartialEq)]
pub struct VerdictRuling {
    pub verdict: Verdict,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuspensionAction {
    pub technician_id: Uuid,
    pub reason: String,
    pub transfer_credits: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountAction {
    pub service_request_id: Uuid,
    pub amount: BigDecimal,
    pub reason: String,
}

/// A checked admin update. Every action in here has already had its
/// preconditions verified against the ticket it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCommand {
    pub status: Option<TicketStatus>,
    pub admin_notes: Option<String>,
    pub resolution: Option<String>,
    pub verdict: Option<VerdictRuling>,
    pub suspension: Option<SuspensionAction>,
    pub discount: Option<DiscountAction>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AdminCommand {
    pub fn build(ticket: &SupportTicket, body: AdminTicketUpdateDto) -> Result<Self, ServiceError> {
        let verdict_notes = non_blank(body.verdict_notes);

        let verdict = match body.verdict {
            Some(_) if !ticket.is_dispute() => return Err(ServiceError::NotADispute(ticket.id)),
            Some(verdict) => Some(VerdictRuling {
                verdict,
                notes: verdict_notes.clone(),
            }),
            None => None,
        };

        if let Some(amount) = &body.discount_amount {
            if amount < &BigDecimal::zero() {
                return Err(ServiceError::Validation(
                    "Discount amount cannot be negative".to_string(),
                ));
            }
        }

        let suspension = if body.suspend_technician || body.ban_technician {
            match ticket.against_id {
                Some(technician_id) => Some(SuspensionAction {
                    technician_id,
                    reason: verdict_notes
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SUSPENSION_REASON.to_string()),
                    transfer_credits: body.transfer_credits,
                }),
                None => {
                    tracing::warn!(
                        "Ticket {} has no accused party; suspension request ignored",
                        ticket.id
                    );
                    None
                }
            }
        } else {
            None
        };

        let discount = match (body.discount_amount, ticket.service_request_id) {
            (Some(amount), Some(service_request_id)) if amount > BigDecimal::zero() => {
                Some(DiscountAction {
                    service_request_id,
                    amount,
                    reason: non_blank(body.discount_reason)
                        .unwrap_or_else(|| DEFAULT_DISCOUNT_REASON.to_string()),
                })
            }
            (Some(amount), None) if amount > BigDecimal::zero() => {
                tracing::warn!(
                    "Ticket {} has no service request; discount of {} ignored",
                    ticket.id,
                    amount
                );
                None
            }
            _ => None,
        };

        Ok(AdminCommand {
            status: body.status,
            admin_notes: non_blank(body.admin_notes),
            resolution: non_blank(body.resolution),
            verdict,
            suspension,
            discount,
        })
    }

    fn patch(&self) -> TicketAdminPatch {
        TicketAdminPatch {
            status: self.status,
            admin_notes: self.admin_notes.clone(),
            resolution: self.resolution.clone(),
            verdict: self.verdict.as_ref().map(|r| r.verdict),
            verdict_notes: self.verdict.as_ref().and_then(|r| r.notes.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffectStep {
    CreditLookup,
    Suspension,
    CreditTransfer,
    Discount,
}

#[derive(Debug)]
pub struct SideEffectFailure {
    pub step: SideEffectStep,
    pub error: sqlx::Error,
}

/// What an admin update did beyond the ticket row. Only `ticket` reaches the
/// HTTP caller; the rest is for logs and tests.
#[derive(Debug)]
pub struct AdminUpdateOutcome {
    pub ticket: SupportTicket,
    pub technician: Option<TechnicianAccount>,
    pub credits_transferred: i64,
    pub discount_applied: bool,
    pub failures: Vec<SideEffectFailure>,
    pub delivery: DeliveryReport,
}

impl AdminUpdateOutcome {
    pub fn failed(&self, step: SideEffectStep) -> bool {
        self.failures.iter().any(|f| f.step == step)
    }
}

#[derive(Debug, Clone)]
pub struct VerdictService {
    store: Arc<dyn MarketplaceStore>,
    notification_service: Arc<NotificationService>,
}

impl VerdictService {
    pub fn new(store: Arc<dyn MarketplaceStore>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            store,
            notification_service,
        }
    }

    /// Applies an admin status/verdict update. The ticket row is committed
    /// first; suspension, credit transfer, discount and notifications follow
    /// as independent best-effort steps that never undo it.
    pub async fn apply_admin_update(
        &self,
        session: &Session,
        ticket_id: Uuid,
        body: AdminTicketUpdateDto,
    ) -> Result<AdminUpdateOutcome, ServiceError> {
        let admin = session.require_admin()?;

        let current = self
            .store
            .get_support_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        let command = AdminCommand::build(&current, body)?;
        let now = Utc::now();

        let ticket = self
            .store
            .apply_admin_patch(ticket_id, command.patch(), now)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        tracing::info!(
            "Admin {} updated ticket {}: status {}, verdict {:?}",
            admin.id,
            ticket.id,
            ticket.status.to_str(),
            ticket.verdict
        );

        let mut outcome = AdminUpdateOutcome {
            ticket,
            technician: None,
            credits_transferred: 0,
            discount_applied: false,
            failures: Vec::new(),
            delivery: DeliveryReport::default(),
        };
        let mut batch = Vec::new();

        if let Some(ruling) = &command.verdict {
            batch.extend(verdict_notices(&outcome.ticket, ruling, command.resolution.as_deref()));
        }

        if let Some(action) = &command.suspension {
            self.suspend(action, now, &mut outcome, &mut batch).await;
        }

        if let Some(action) = &command.discount {
            self.apply_discount(action, &mut outcome, &mut batch).await;
        }

        outcome.delivery = self.notification_service.send(batch).await;

        if !outcome.failures.is_empty() {
            tracing::warn!(
                "Ticket {} committed with {} failed side effect(s): {:?}",
                outcome.ticket.id,
                outcome.failures.len(),
                outcome.failures.iter().map(|f| f.step).collect::<Vec<_>>()
            );
        }

        Ok(outcome)
    }

    async fn suspend(
        &self,
        action: &SuspensionAction,
        now: DateTime<Utc>,
        outcome: &mut AdminUpdateOutcome,
        batch: &mut Vec<NewNotification>,
    ) {
        // balance is read before anything is written so the transfer notice
        // carries the real amount
        let balance = match self.store.get_technician_account(action.technician_id).await {
            Ok(Some(account)) => account.credits,
            Ok(None) => {
                tracing::warn!("Technician {} not found; no credits to transfer", action.technician_id);
                0
            }
            Err(error) => {
                tracing::warn!("Credit lookup for technician {} failed: {}", action.technician_id, error);
                outcome.failures.push(SideEffectFailure { step: SideEffectStep::CreditLookup, error });
                0
            }
        };

        match self
            .store
            .suspend_technician(action.technician_id, action.reason.clone(), now)
            .await
        {
            Ok(account) => {
                tracing::info!("Technician {} suspended and delisted", account.id);
                outcome.technician = Some(account);
            }
            Err(error) => {
                tracing::error!("Suspending technician {} failed: {}", action.technician_id, error);
                outcome.failures.push(SideEffectFailure { step: SideEffectStep::Suspension, error });
            }
        }

        if action.transfer_credits && balance > 0 {
            match self.store.zero_technician_credits(action.technician_id).await {
                Ok(account) => {
                    tracing::info!(
                        "Transferred {} credits from technician {} to reporter {}",
                        balance,
                        account.id,
                        outcome.ticket.reporter_id
                    );
                    outcome.credits_transferred = balance;
                    outcome.technician = Some(account);
                    batch.push(notification_service::credits_transferred(&outcome.ticket, balance));
                }
                Err(error) => {
                    tracing::error!("Credit transfer from technician {} failed: {}", action.technician_id, error);
                    outcome.failures.push(SideEffectFailure { step: SideEffectStep::CreditTransfer, error });
                }
            }
        }

        if !outcome.failed(SideEffectStep::Suspension) {
            batch.push(notification_service::account_suspended(
                &outcome.ticket,
                action.technician_id,
                &action.reason,
            ));
        }
    }

    async fn apply_discount(
        &self,
        action: &DiscountAction,
        outcome: &mut AdminUpdateOutcome,
        batch: &mut Vec<NewNotification>,
    ) {
        match self
            .store
            .apply_admin_discount(action.service_request_id, action.amount.clone(), action.reason.clone())
            .await
        {
            Ok(request) => {
                tracing::info!("Discount of {} applied to service request {}", action.amount, request.id);
                outcome.discount_applied = true;
                batch.push(notification_service::discount_applied(&outcome.ticket, &action.amount));
            }
            Err(error) => {
                tracing::error!(
                    "Applying discount to service request {} failed: {}",
                    action.service_request_id,
                    error
                );
                outcome.failures.push(SideEffectFailure { step: SideEffectStep::Discount, error });
            }
        }
    }
}

fn verdict_notices(
    ticket: &SupportTicket,
    ruling: &VerdictRuling,
    resolution: Option<&str>,
) -> Vec<NewNotification> {
    let parties: Vec<Uuid> = std::iter::once(ticket.reporter_id)
        .chain(ticket.against_id)
        .collect();

    let mut notices: Vec<NewNotification> = parties
        .iter()
        .map(|&user| {
            notification_service::verdict_announced(ticket, user, ruling.verdict, ruling.notes.as_deref())
        })
        .collect();

    if let Some(resolution) = resolution {
        notices.extend(
            parties
                .iter()
                .map(|&user| notification_service::resolution_recorded(ticket, user, resolution)),
        );
    }

    notices
}
