// db/servicerequestdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::marketplacemodel::ServiceRequestDiscount;

#[async_trait]
pub trait ServiceRequestExt {
    async fn apply_admin_discount(
        &self,
        service_request_id: Uuid,
        amount: BigDecimal,
        reason: String,
    ) -> Result<ServiceRequestDiscount, Error>;
}

#[async_trait]
impl ServiceRequestExt for DBClient {
    async fn apply_admin_discount(
        &self,
        service_request_id: Uuid,
        amount: BigDecimal,
        reason: String,
    ) -> Result<ServiceRequestDiscount, Error> {
        sqlx::query_as::<_, ServiceRequestDiscount>(
            r#"
            UPDATE service_requests
            SET admin_discount = $2, admin_discount_reason = $3
            WHERE id = $1
            RETURNING id, admin_discount, admin_discount_reason
            "#
        )
        .bind(service_request_id)
        .bind(amount)
        .bind(reason)
        .fetch_one(&self.pool)
        .await
    }
}
