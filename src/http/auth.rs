use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::app::identity::IdentityService;
use crate::domain::id::ObjectId;
use crate::http::AppError;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("invalid Authorization header"))?;

        let service = IdentityService::new(state.paseto_access_key);
        let caller = service
            .authenticate_access_token(token.trim())
            .map_err(|err| {
                tracing::error!(error = ?err, "failed to authenticate");
                AppError::internal("failed to authenticate")
            })?;

        let caller = caller.ok_or_else(|| AppError::unauthorized("invalid token"))?;
        Ok(AuthUser {
            user_id: caller.user_id,
        })
    }
}
