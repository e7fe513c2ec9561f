/// Real-time provider token bridge
///
/// Direct messages are delivered client-to-provider; the API's only role
/// is asserting the caller's identity to the provider via a signed
/// custom token.
use crate::auth::RealtimeTokenMinter;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// Minter handle; empty when no service-account credentials were
/// configured at startup.
#[derive(Clone, Default)]
pub struct RealtimeState {
    pub minter: Option<Arc<RealtimeTokenMinter>>,
}

/// Mint a custom token for the caller
pub async fn mint_token(
    state: web::Data<RealtimeState>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let minter = state.minter.as_ref().ok_or_else(|| {
        AppError::Internal("Real-time credentials not configured".to_string())
    })?;

    let token = minter
        .mint(&user.0)
        .map_err(|e| AppError::Internal(format!("Failed to create custom token: {}", e)))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "token": token })))
}
