//! Failure taxonomy of the gate and the factory that turns it into rejection signals.
//!
//! The gating decision collapses most of these into one reject outcome, but the variants
//! stay distinct so logs can tell a bad header from a bad signature.

use crate::error::AppError;
use crate::services::auth::extract::ExtractionError;
use crate::services::auth::verifier::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("credential extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("credential format is invalid")]
    Format,
    #[error("credential signature is invalid")]
    Signature,
    #[error("credential claims could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    #[error("credential has expired")]
    Expired,
    #[error("credential lacks required role '{0}'")]
    Authorization(String),
    #[error("invalid authorization configuration: {0}")]
    Configuration(&'static str),
}

impl AuthFailure {
    /// Short, stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthFailure::Extraction(_) => "extraction",
            AuthFailure::Format => "format",
            AuthFailure::Signature => "signature",
            AuthFailure::Decode(_) => "decode",
            AuthFailure::Expired => "expired",
            AuthFailure::Authorization(_) => "authorization",
            AuthFailure::Configuration(_) => "configuration",
        }
    }

    /// Caller/integration bug rather than a credential problem; never absorbed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AuthFailure::Configuration(_))
    }
}

/// Builds the rejection values the gate hands back to the transport.
pub trait ErrorFactory: Send + Sync {
    fn login_required(&self) -> AppError;

    fn not_authorized(&self) -> AppError;

    fn used_token(&self) -> AppError;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorFactory;

impl ErrorFactory for DefaultErrorFactory {
    fn login_required(&self) -> AppError {
        AppError::LoginRequired
    }

    fn not_authorized(&self) -> AppError {
        AppError::NotAuthorized
    }

    fn used_token(&self) -> AppError {
        AppError::UsedToken
    }
}

/// Rejection for a one-time credential that has already been consumed.
///
/// Not a pipeline stage: handlers raise it themselves, e.g. `return Err(signal_used_token())`.
pub fn signal_used_token() -> AppError {
    DefaultErrorFactory.used_token()
}
