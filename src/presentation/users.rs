use crate::domain::user::{CreateUser, UpdateUser};
use crate::presentation::handlers::{ApiError, AppState, ItemResponse, ListResponse};
use crate::validation::{parse_payload, schemas};
use actix_web::{HttpResponse, web};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

#[instrument(skip(state))]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state.user_service.list_users().await?;
    info!(total = users.len(), "Users listed");
    Ok(HttpResponse::Ok().json(ListResponse::new(users)))
}

#[instrument(skip(state), fields(user_id = %*path))]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let user = state.user_service.get_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(user)))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    debug!(schema = schemas::CREATE_USER.name, "Validating payload");
    let req: CreateUser = parse_payload(&schemas::CREATE_USER, payload.into_inner())?;
    info!(email = %req.email, "Creating user");
    let user = state.user_service.create_user(req).await.map_err(|e| {
        error!(error = %e, "Failed to create user");
        ApiError::from(e)
    })?;
    info!(user_id = user.id, "User created successfully");
    Ok(HttpResponse::Created()
        .json(ItemResponse::new(user).with_message("User created successfully")))
}

#[instrument(skip(state, payload), fields(user_id = %*path))]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    debug!(schema = schemas::UPDATE_USER.name, "Validating payload");
    let req: UpdateUser = parse_payload(&schemas::UPDATE_USER, payload.into_inner())?;
    let user = state
        .user_service
        .update_user(path.into_inner(), req)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update user");
            ApiError::from(e)
        })?;
    info!(user_id = user.id, "User updated successfully");
    Ok(HttpResponse::Ok().json(ItemResponse::new(user).with_message("User updated successfully")))
}

#[instrument(skip(state), fields(user_id = %*path))]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .user_service
        .delete_user(path.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to delete user");
            ApiError::from(e)
        })?;
    info!(user_id = user.id, "User deleted successfully");
    Ok(HttpResponse::Ok().json(ItemResponse::new(user).with_message("User deleted successfully")))
}
