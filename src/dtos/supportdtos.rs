use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::supportmodel::*;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTicketDto {
    pub ticket_type: TicketType,

    pub against_id: Option<Uuid>,

    pub service_request_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Subject must be between 1 and 200 characters"))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Description must be between 1 and 5000 characters"))]
    pub description: String,

    #[serde(default)]
    #[validate(
        length(max = 10, message = "At most 10 evidence photos can be attached"),
        custom = "validate_evidence_urls"
    )]
    pub evidence_photos: Vec<String>,
}

fn validate_evidence_urls(urls: &Vec<String>) -> Result<(), ValidationError> {
    if urls.iter().all(|url| validator::validate_url(url.as_str())) {
        Ok(())
    } else {
        let mut err = ValidationError::new("evidence_url");
        err.message = Some("Evidence photos must be valid URLs".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TechnicianResponseDto {
    #[validate(length(min = 1, max = 5000, message = "Response must be between 1 and 5000 characters"))]
    pub response: String,
}

/// Admin form payload. The flags are loose on the wire and are turned into
/// an `AdminCommand` before anything is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminTicketUpdateDto {
    pub status: Option<TicketStatus>,

    #[validate(length(max = 5000))]
    pub admin_notes: Option<String>,

    #[validate(length(max = 5000))]
    pub resolution: Option<String>,

    pub verdict: Option<Verdict>,

    #[validate(length(max = 5000))]
    pub verdict_notes: Option<String>,

    #[serde(default)]
    pub suspend_technician: bool,

    /// Reserved; currently treated like `suspend_technician`.
    #[serde(default)]
    pub ban_technician: bool,

    #[serde(default)]
    pub transfer_credits: bool,

    pub discount_amount: Option<BigDecimal>,

    #[validate(length(max = 500))]
    pub discount_reason: Option<String>,
}
