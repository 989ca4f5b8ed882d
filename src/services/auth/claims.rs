use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::services::auth::expiry::CredentialAge;

/// JOSE header of a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

/// Claims carried by a bearer credential.
///
/// NOTE:
/// - `iat` is a Unix timestamp in *milliseconds* (issuer convention), not seconds.
/// - Claims this gate does not interpret are kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Header + payload of a verified credential, owned by the request it was decoded for.
///
/// `age` is derived by the expiry calculator on demand and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedCredential {
    pub header: CredentialHeader,
    pub payload: CredentialPayload,
    #[serde(skip)]
    pub age: Option<CredentialAge>,
}

impl DecodedCredential {
    pub fn new(header: CredentialHeader, payload: CredentialPayload) -> Self {
        Self {
            header,
            payload,
            age: None,
        }
    }

    pub fn client_id(&self) -> Option<&str> {
        self.payload.client_id.as_deref()
    }

    pub fn roles(&self) -> &[String] {
        &self.payload.roles
    }
}
