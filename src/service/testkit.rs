// Shared fixtures for service tests.
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::memorydb::MemoryStore,
    dtos::supportdtos::CreateTicketDto,
    models::{
        supportmodel::TicketType,
        usermodel::{AuthUser, UserRole},
    },
    service::{
        notification_service::NotificationService,
        outbox::NotificationOutbox,
        session::Session,
        ticket_service::TicketService,
        verdict_service::VerdictService,
    },
};

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub outbox: Arc<NotificationOutbox>,
    pub notifications: Arc<NotificationService>,
    pub tickets: TicketService,
    pub verdicts: VerdictService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let outbox = Arc::new(NotificationOutbox::new(
            store.clone(),
            3,
            std::time::Duration::ZERO,
        ));
        let notifications = Arc::new(NotificationService::new(store.clone(), outbox.clone()));
        let tickets = TicketService::new(store.clone(), notifications.clone(), chrono::Duration::hours(24));
        let verdicts = VerdictService::new(store.clone(), notifications.clone());

        Self {
            store,
            outbox,
            notifications,
            tickets,
            verdicts,
        }
    }
}

pub fn session(id: Uuid, role: UserRole) -> Session {
    Session::authenticated(AuthUser { id, role })
}

pub fn admin() -> Session {
    session(Uuid::new_v4(), UserRole::Admin)
}

pub fn dispute(against: Uuid, service_request: Option<Uuid>) -> CreateTicketDto {
    CreateTicketDto {
        ticket_type: TicketType::Dispute,
        against_id: Some(against),
        service_request_id: service_request,
        subject: "Broken pipe".to_string(),
        description: "The kitchen pipe burst a day after the repair".to_string(),
        evidence_photos: vec!["https://cdn.fixhub.app/evidence/pipe.jpg".to_string()],
    }
}

pub fn support_request() -> CreateTicketDto {
    CreateTicketDto {
        ticket_type: TicketType::Support,
        against_id: None,
        service_request_id: None,
        subject: "Cannot update my address".to_string(),
        description: "The save button does nothing".to_string(),
        evidence_photos: Vec::new(),
    }
}
