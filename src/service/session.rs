// service/session.rs
use crate::{models::usermodel::AuthUser, service::error::ServiceError};

/// Who is calling. Built by the auth middleware for HTTP requests.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<AuthUser>,
}

impl Session {
    pub fn authenticated(user: AuthUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn require_user(&self) -> Result<&AuthUser, ServiceError> {
        self.user.as_ref().ok_or(ServiceError::Unauthenticated)
    }

    pub fn require_admin(&self) -> Result<&AuthUser, ServiceError> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(ServiceError::AdminRequired);
        }
        Ok(user)
    }
}
