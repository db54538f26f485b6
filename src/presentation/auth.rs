use crate::domain::user::{LoginRequest, PublicUser};
use crate::presentation::handlers::{ApiError, AppState};
use crate::validation::{parse_payload, schemas};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
    pub message: String,
}

#[instrument(skip(state, payload))]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    debug!(schema = schemas::LOGIN.name, "Validating payload");
    let req: LoginRequest = parse_payload(&schemas::LOGIN, payload.into_inner())?;
    info!(email = %req.email, "Login request received");

    let outcome = state.auth_service.login(req).await.map_err(|e| {
        error!(error = %e, "Failed to login");
        ApiError::from(e)
    })?;

    let response = LoginResponse {
        success: true,
        token: outcome.token,
        user: outcome.user,
        message: "Login successful".to_string(),
    };

    info!(user_id = response.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(response))
}
