/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{AuthService, PublicKey};

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, AppError> {
    let public_key =
        PublicKey::from_pem(&config.access_jwt_public_key_pem, config.access_jwt_algorithm)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load access JWT public key");
                AppError::Internal
            })?;

    Ok(Arc::new(AuthService::new(public_key)))
}
