// db/techniciandb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::marketplacemodel::TechnicianAccount;

#[async_trait]
pub trait TechnicianExt {
    async fn get_technician_account(
        &self,
        technician_id: Uuid,
    ) -> Result<Option<TechnicianAccount>, Error>;

    /// Flags the account suspended and drops it from the catalog.
    async fn suspend_technician(
        &self,
        technician_id: Uuid,
        reason: String,
        suspended_at: DateTime<Utc>,
    ) -> Result<TechnicianAccount, Error>;

    async fn zero_technician_credits(
        &self,
        technician_id: Uuid,
    ) -> Result<TechnicianAccount, Error>;
}

#[async_trait]
impl TechnicianExt for DBClient {
    async fn get_technician_account(
        &self,
        technician_id: Uuid,
    ) -> Result<Option<TechnicianAccount>, Error> {
        sqlx::query_as::<_, TechnicianAccount>(
            r#"
            SELECT id, credits, suspended, suspended_at, suspension_reason, active
            FROM technicians
            WHERE id = $1
            "#
        )
        .bind(technician_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn suspend_technician(
        &self,
        technician_id: Uuid,
        reason: String,
        suspended_at: DateTime<Utc>,
    ) -> Result<TechnicianAccount, Error> {
        sqlx::query_as::<_, TechnicianAccount>(
            r#"
            UPDATE technicians
            SET suspended = TRUE,
                suspended_at = $2,
                suspension_reason = $3,
                active = FALSE
            WHERE id = $1
            RETURNING id, credits, suspended, suspended_at, suspension_reason, active
            "#
        )
        .bind(technician_id)
        .bind(suspended_at)
        .bind(reason)
        .fetch_one(&self.pool)
        .await
    }

    async fn zero_technician_credits(
        &self,
        technician_id: Uuid,
    ) -> Result<TechnicianAccount, Error> {
        sqlx::query_as::<_, TechnicianAccount>(
            r#"
            UPDATE technicians
            SET credits = 0
            WHERE id = $1
            RETURNING id, credits, suspended, suspended_at, suspension_reason, active
            "#
        )
        .bind(technician_id)
        .fetch_one(&self.pool)
        .await
    }
}
