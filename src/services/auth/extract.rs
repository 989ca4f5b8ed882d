/*
 * Responsibility
 * - ヘッダ値から `<scheme> <token>` を分解し、token 部分だけを取り出す
 * - scheme は "bearer" (大文字小文字は区別しない)
 * - ヘッダ名 (Authorization / Visitor) の定義
 */
use axum::http::{HeaderName, HeaderValue, header};

pub const AUTHORIZATION_HEADER: HeaderName = header::AUTHORIZATION;
pub const VISITOR_HEADER: HeaderName = HeaderName::from_static("visitor");

const BEARER_SCHEME: &str = "bearer";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("missing credential header")]
    MissingHeader,
    #[error("credential header is not visible ASCII")]
    InvalidEncoding,
    #[error("credential header does not use the bearer scheme")]
    SchemeMismatch,
    #[error("credential header carries no token")]
    MissingCredential,
}

/// Pull the token out of a `Bearer <token>` header value.
///
/// Anything after the token is ignored.
pub fn bearer_token(value: Option<&HeaderValue>) -> Result<&str, ExtractionError> {
    let raw = value
        .ok_or(ExtractionError::MissingHeader)?
        .to_str()
        .map_err(|_| ExtractionError::InvalidEncoding)?;

    parse_bearer(raw)
}

pub fn parse_bearer(raw: &str) -> Result<&str, ExtractionError> {
    let mut parts = raw.split_whitespace();

    let scheme = parts.next().ok_or(ExtractionError::SchemeMismatch)?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(ExtractionError::SchemeMismatch);
    }

    parts.next().ok_or(ExtractionError::MissingCredential)
}
