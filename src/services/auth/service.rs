use axum::http::HeaderValue;
use std::{fmt, sync::Arc};

use crate::services::auth::claims::DecodedCredential;
use crate::services::auth::expiry;
use crate::services::auth::extract;
use crate::services::auth::failure::{AuthFailure, DefaultErrorFactory, ErrorFactory};
use crate::services::auth::format::{self, FormatValidator, JwtFormat};
use crate::services::auth::pipeline::{Progress, Stage};
use crate::services::auth::roles;
use crate::services::auth::verifier::{self, CredentialVerifier, JwtVerifier, PublicKey};

/// Credential checks shared by every gate of an application.
///
/// Holds the public key and the three external collaborators; all immutable, so one
/// instance is shared behind an `Arc` by concurrent requests.
#[derive(Clone)]
pub struct AuthService {
    public_key: PublicKey,
    format: Arc<dyn FormatValidator>,
    verifier: Arc<dyn CredentialVerifier>,
    errors: Arc<dyn ErrorFactory>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("algorithm", &self.public_key.algorithm())
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Default collaborators: `JwtFormat`, `JwtVerifier`, `DefaultErrorFactory`.
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            public_key,
            format: Arc::new(JwtFormat),
            verifier: Arc::new(JwtVerifier),
            errors: Arc::new(DefaultErrorFactory),
        }
    }

    pub fn with_format_validator(mut self, format: Arc<dyn FormatValidator>) -> Self {
        self.format = format;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_error_factory(mut self, errors: Arc<dyn ErrorFactory>) -> Self {
        self.errors = errors;
        self
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn errors(&self) -> &dyn ErrorFactory {
        self.errors.as_ref()
    }

    /// Extraction → format → signature → decode.
    ///
    /// Each step only runs once the previous one passed; the first failure is returned
    /// as-is so the caller can log which step refused the credential.
    pub async fn authenticate(
        &self,
        header: Option<&HeaderValue>,
        progress: &mut Progress,
    ) -> Result<DecodedCredential, AuthFailure> {
        let token = extract::bearer_token(header)?;
        progress.advance(Stage::Extracted);

        if !format::check_format(self.format.as_ref(), Some(token)) {
            return Err(AuthFailure::Format);
        }
        progress.advance(Stage::FormatOk);

        if !verifier::verify_signature(self.verifier.as_ref(), Some(token), &self.public_key)
            .await
        {
            return Err(AuthFailure::Signature);
        }
        progress.advance(Stage::SignatureOk);

        let credential = self.verifier.decode_claims(token).await?;
        progress.advance(Stage::Decoded);

        Ok(credential)
    }

    /// Post-decode checks: age window (when configured) then role (when required).
    pub fn authorize(
        &self,
        mut credential: DecodedCredential,
        validity_seconds: Option<f64>,
        required_role: Option<&str>,
        progress: &mut Progress,
    ) -> Result<DecodedCredential, AuthFailure> {
        if validity_seconds.is_some() && expiry::is_expired(&mut credential, validity_seconds) {
            return Err(AuthFailure::Expired);
        }

        if let Some(role) = required_role {
            if !roles::has_role(&credential, Some(role))? {
                return Err(AuthFailure::Authorization(role.to_string()));
            }
        }
        progress.advance(Stage::Authorized);

        Ok(credential)
    }
}
