// models/usermodel.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::supportmodel::ReporterRole;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Technician,
    Vendor,
    Delivery,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Client => "client",
            UserRole::Technician => "technician",
            UserRole::Vendor => "vendor",
            UserRole::Delivery => "delivery",
            UserRole::Admin => "admin",
        }
    }

    /// Admins resolve tickets; they never file them.
    pub fn reporter_role(&self) -> Option<ReporterRole> {
        match self {
            UserRole::Client => Some(ReporterRole::Client),
            UserRole::Technician => Some(ReporterRole::Technician),
            UserRole::Vendor => Some(ReporterRole::Vendor),
            UserRole::Delivery => Some(ReporterRole::Delivery),
            UserRole::Admin => None,
        }
    }
}

/// The caller identity carried by a verified token.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
