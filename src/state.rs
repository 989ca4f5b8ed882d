/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: AuthService (公開鍵 + 検証の協力者たち。不変なので共有してよい)
 *   - gate の設定値 (必要ロール、有効期限)
 *   - redeemed: 使い捨てトークンの使用済み jti (期限付きで保持)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub admin_role: String,
    pub jwt_validity_seconds: Option<f64>,
    pub redeemed: RedeemedTokens,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        admin_role: String,
        jwt_validity_seconds: Option<f64>,
    ) -> Self {
        Self {
            auth,
            admin_role,
            jwt_validity_seconds,
            redeemed: RedeemedTokens::default(),
        }
    }
}

/// In-process record of one-time credentials already used (by `jti`).
///
/// Each entry is kept only until its credential can no longer pass the gate's validity
/// window; expired entries are pruned on every insert.
#[derive(Clone, Debug, Default)]
pub struct RedeemedTokens(Arc<Mutex<HashMap<String, i64>>>);

// ゲートに期限が無い場合の保持期間
const UNWINDOWED_RETENTION_MS: i64 = 24 * 60 * 60 * 1000;

impl RedeemedTokens {
    /// `true` the first time a `jti` is seen, `false` while it is remembered.
    ///
    /// `forget_after_ms` is the epoch-millisecond instant after which the entry is dropped.
    pub fn first_use(&self, jti: &str, forget_after_ms: i64, now_ms: i64) -> bool {
        let mut seen = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.retain(|_, until| *until > now_ms);

        if seen.contains_key(jti) {
            return false;
        }
        seen.insert(jti.to_string(), forget_after_ms);
        true
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Instant after which a redeemed credential no longer needs remembering: `iat` + window
/// when both are known, otherwise a fixed retention from now.
pub fn redeem_deadline(iat_ms: Option<i64>, validity_seconds: Option<f64>, now_ms: i64) -> i64 {
    let window_ms = validity_seconds
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| (s.trunc() as i64).saturating_mul(1000));

    match (iat_ms, window_ms) {
        (Some(iat), Some(window)) => iat.saturating_add(window),
        _ => now_ms.saturating_add(UNWINDOWED_RETENTION_MS),
    }
}
