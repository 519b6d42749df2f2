use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Ticket {0} not found")]
    TicketNotFound(Uuid),

    #[error("Ticket {0} is not a dispute")]
    NotADispute(Uuid),

    #[error("A response has already been submitted for ticket {0}")]
    ResponseAlreadySubmitted(Uuid),

    #[error("User {0} is not authorized to perform this action on ticket {1}")]
    UnauthorizedTicketAccess(Uuid, Uuid),

    #[error("Admin privileges are required")]
    AdminRequired,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::TicketNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::NotADispute(_)
            | ServiceError::ResponseAlreadySubmitted(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,

            ServiceError::UnauthorizedTicketAccess(_, _)
            | ServiceError::AdminRequired => StatusCode::FORBIDDEN,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        if let ServiceError::Database(ref e) = error {
            tracing::error!("Database error: {}", e);
        }
        HttpError::new(error.to_string(), error.status_code())
    }
}
