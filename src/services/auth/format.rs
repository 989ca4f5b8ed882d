/// Syntactic check of a credential string, before any cryptography.
pub trait FormatValidator: Send + Sync {
    fn is_valid(&self, token: &str) -> bool;
}

/// Compact JWS shape: `header.payload.signature`, each a non-empty base64url segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtFormat;

impl FormatValidator for JwtFormat {
    fn is_valid(&self, token: &str) -> bool {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return false;
        };

        [header, payload, signature]
            .iter()
            .all(|segment| is_base64url_segment(segment))
    }
}

fn is_base64url_segment(segment: &str) -> bool {
    let body = segment.trim_end_matches('=');
    !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// An absent token fails without reaching the validator.
pub fn check_format(validator: &dyn FormatValidator, token: Option<&str>) -> bool {
    match token {
        Some(token) => validator.is_valid(token),
        None => false,
    }
}
