use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::SharedState;

/// Admin API access. Checks the bearer token when one is configured.
#[derive(Debug, Clone)]
pub struct ApiAccess;

impl FromRequestParts<SharedState> for ApiAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.api_token.as_deref() else {
            return Ok(ApiAccess);
        };

        let auth_header = parts
            .headers
            .get("authorization")
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

        if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(ApiAccess)
        } else {
            Err(AppError::Unauthorized("Invalid token".to_string()))
        }
    }
}
