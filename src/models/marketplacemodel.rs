// models/marketplacemodel.rs
//
// Rows owned by the wider marketplace that verdicts reach into.
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct TechnicianAccount {
    pub id: Uuid,
    pub credits: i64,
    pub suspended: bool,
    pub suspended_at: Option<DateTime<Utc>>,
    pub suspension_reason: Option<String>,
    /// Listed in the catalog and eligible for matching.
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct ServiceRequestDiscount {
    pub id: Uuid,
    pub admin_discount: Option<BigDecimal>,
    pub admin_discount_reason: Option<String>,
}
