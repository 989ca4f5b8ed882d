pub mod claims;
pub mod expiry;
pub mod extract;
pub mod factory;
pub mod failure;
pub mod format;
pub mod pipeline;
pub mod roles;
pub mod service;
pub mod verifier;

pub use claims::DecodedCredential;
pub use factory::build_auth_service;
pub use failure::{AuthFailure, ErrorFactory, signal_used_token};
pub use service::AuthService;
pub use verifier::{CredentialVerifier, PublicKey};
