//! Credential age / expiry.
//!
//! Age is always measured against "now" at the moment of the call and written back onto
//! the credential, so asking twice within one request yields a non-decreasing age.

use chrono::Utc;

use crate::services::auth::claims::DecodedCredential;

/// Elapsed time since a credential was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialAge {
    /// Milliseconds since `iat`.
    Millis(i64),
    /// No `iat` claim: treated as infinitely old.
    Unbounded,
}

impl CredentialAge {
    /// `window_ms < age`
    pub fn exceeds(&self, window_ms: i64) -> bool {
        match self {
            CredentialAge::Millis(age) => window_ms < *age,
            CredentialAge::Unbounded => true,
        }
    }
}

pub fn compute_age(credential: &mut DecodedCredential) -> CredentialAge {
    compute_age_at(credential, Utc::now().timestamp_millis())
}

pub fn compute_age_at(credential: &mut DecodedCredential, now_ms: i64) -> CredentialAge {
    let age = match credential.payload.iat {
        Some(iat) => CredentialAge::Millis(now_ms.saturating_sub(iat)),
        None => CredentialAge::Unbounded,
    };
    credential.age = Some(age);
    age
}

/// Whether the credential is older than `validity_seconds`.
///
/// Fails closed: an absent, NaN, infinite, zero or negative window means expired.
/// Fractional seconds are truncated.
pub fn is_expired(credential: &mut DecodedCredential, validity_seconds: Option<f64>) -> bool {
    is_expired_at(
        credential,
        validity_seconds,
        Utc::now().timestamp_millis(),
    )
}

pub fn is_expired_at(
    credential: &mut DecodedCredential,
    validity_seconds: Option<f64>,
    now_ms: i64,
) -> bool {
    let Some(window_ms) = validity_window_ms(validity_seconds) else {
        return true;
    };

    compute_age_at(credential, now_ms).exceeds(window_ms)
}

fn validity_window_ms(validity_seconds: Option<f64>) -> Option<i64> {
    let seconds = validity_seconds.filter(|s| s.is_finite() && *s > 0.0)?;
    Some((seconds.trunc() as i64).saturating_mul(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::claims::{CredentialHeader, CredentialPayload};

    fn credential_issued_at(iat: Option<i64>) -> DecodedCredential {
        DecodedCredential::new(
            CredentialHeader {
                alg: "EdDSA".into(),
                typ: Some("JWT".into()),
            },
            CredentialPayload {
                iat,
                client_id: None,
                roles: vec![],
                extra: Default::default(),
            },
        )
    }

    #[test]
    fn age_is_now_minus_iat() {
        let mut cred = credential_issued_at(Some(1_000));
        assert_eq!(compute_age_at(&mut cred, 5_000), CredentialAge::Millis(4_000));
        assert_eq!(cred.age, Some(CredentialAge::Millis(4_000)));
    }

    #[test]
    fn age_without_iat_is_unbounded() {
        let mut cred = credential_issued_at(None);
        assert_eq!(compute_age(&mut cred), CredentialAge::Unbounded);
        assert!(is_expired(&mut cred, Some(1_000_000.0)));
    }

    #[test]
    fn age_is_recomputed_and_never_decreases() {
        let mut cred = credential_issued_at(Some(Utc::now().timestamp_millis() - 10));

        let first = compute_age(&mut cred);
        let second = compute_age(&mut cred);

        let (CredentialAge::Millis(a), CredentialAge::Millis(b)) = (first, second) else {
            panic!("expected finite ages");
        };
        assert!(b >= a);
        assert_eq!(cred.age, Some(second));
    }

    #[test]
    fn old_credential_is_expired() {
        // issued 40 s ago, valid for 30 s
        let now = Utc::now().timestamp_millis();
        let mut cred = credential_issued_at(Some(now - 40_000));
        assert!(is_expired(&mut cred, Some(30.0)));
    }

    #[test]
    fn fresh_credential_is_not_expired() {
        let mut cred = credential_issued_at(Some(10_000));
        assert!(!is_expired_at(&mut cred, Some(30.0), 20_000));
        // boundary: age == window is still valid
        assert!(!is_expired_at(&mut cred, Some(30.0), 40_000));
        assert!(is_expired_at(&mut cred, Some(30.0), 40_001));
    }

    #[test]
    fn invalid_window_fails_closed() {
        let mut cred = credential_issued_at(Some(10_000));
        for window in [None, Some(0.0), Some(-5.0), Some(f64::NAN), Some(f64::INFINITY)] {
            assert!(is_expired_at(&mut cred, window, 10_000), "{window:?}");
        }
    }

    #[test]
    fn fractional_window_is_truncated() {
        let mut cred = credential_issued_at(Some(0));
        assert!(!is_expired_at(&mut cred, Some(1.9), 1_000));
        assert!(is_expired_at(&mut cred, Some(1.9), 1_001));
    }
}
