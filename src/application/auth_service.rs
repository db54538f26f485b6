use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{LoginRequest, PublicUser};
use crate::infrastructure::security::{generate_token, validate_token, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: PublicUser,
}

/// Identity carried by a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u32,
    pub email: String,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome> {
        trace!("Starting login");

        if self.jwt_secret.is_empty() {
            error!("JWT secret is not configured");
            return Err(DomainError::Configuration.into());
        }

        // An unknown email and a wrong password must be indistinguishable
        // to the caller.
        let user = self
            .user_repository
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::InvalidCredentials
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = user.id, email = %user.email, "Invalid password during login");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = generate_token(user.id, &user.email, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = user.id, email = %user.email, "Login successful");

        Ok(LoginOutcome {
            token,
            user: user.to_public(),
        })
    }

    /// Signature and expiry check only; no store lookup.
    #[instrument(skip_all)]
    pub fn verify_token(&self, token: &str) -> Result<AuthenticatedUser> {
        if self.jwt_secret.is_empty() {
            error!("JWT secret is not configured");
            return Err(DomainError::Configuration.into());
        }

        let claims = validate_token(token, &self.jwt_secret).map_err(|e| {
            debug!(error = %e, "Token validation failed");
            DomainError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let user_id = claims.sub.parse().map_err(|_| {
            warn!(sub = %claims.sub, "Token subject is not a user id");
            DomainError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
        })
    }
}
