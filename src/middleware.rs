use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::{ErrorMessage, HttpError},
    models::usermodel::AuthUser,
    service::session::Session,
    utils::token,
    AppState,
};

#[derive(Debug, Clone)]
pub struct JWTAuthMiddeware {
    pub user: AuthUser,
}

impl JWTAuthMiddeware {
    pub fn session(&self) -> Session {
        Session::authenticated(self.user.clone())
    }
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        });

    let token = token.ok_or_else(|| {
        HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string())
    })?;

    let user = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    tracing::debug!("Authenticated {} as {}", user.id, user.role.to_str());

    req.extensions_mut().insert(JWTAuthMiddeware { user });
    Ok(next.run(req).await)
}
