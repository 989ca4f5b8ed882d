/*
 * Responsibility
 * - 認証ゲートの結果を返す response DTO
 * - 署名やトークン文字列そのものは返さない (claims の一部だけ)
 */
use serde::Serialize;

use crate::services::auth::DecodedCredential;
use crate::services::auth::expiry::CredentialAge;
use crate::services::auth::roles::role_name_from_code;

#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub client_id: Option<String>,
    pub roles: Vec<String>,
    pub role_names: Vec<&'static str>,
    pub alg: String,
    // null = iat なし (無限に古い扱い)
    pub age_ms: Option<i64>,
}

impl From<&DecodedCredential> for CredentialResponse {
    fn from(c: &DecodedCredential) -> Self {
        Self {
            client_id: c.client_id().map(str::to_string),
            roles: c.roles().to_vec(),
            role_names: c.roles().iter().map(|r| role_name_from_code(r)).collect(),
            alg: c.header.alg.clone(),
            age_ms: match c.age {
                Some(CredentialAge::Millis(ms)) => Some(ms),
                Some(CredentialAge::Unbounded) | None => None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub authenticated: bool,
    pub principal: Option<CredentialResponse>,
    pub visitor: Option<CredentialResponse>,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub redeemed: String,
}
