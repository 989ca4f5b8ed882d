/*
 * Responsibility
 * - ゲートの後ろにある handler 群
 *   - GET  /me       : strict (principal 必須)
 *   - GET  /admin    : strict + role
 *   - GET  /whoami   : no-throw (principal / visitor は任意)
 *   - POST /redeem   : strict + 使い捨て (2 回目は used token)
 * - 認証の判断は gate 側。ここでは AuthCtx の結果を読むだけ
 */
use axum::{Json, extract::State};
use chrono::Utc;

use crate::api::v1::dto::session::{CredentialResponse, IdentityResponse, RedeemResponse};
use crate::api::v1::extractors::{MaybePrincipal, MaybeVisitor, Principal};
use crate::error::AppError;
use crate::services::auth::expiry::compute_age;
use crate::services::auth::signal_used_token;
use crate::state::{AppState, redeem_deadline};

pub async fn me(Principal(mut credential): Principal) -> Json<CredentialResponse> {
    compute_age(&mut credential);
    Json(CredentialResponse::from(&credential))
}

pub async fn admin(Principal(credential): Principal) -> Json<CredentialResponse> {
    Json(CredentialResponse::from(&credential))
}

pub async fn whoami(
    MaybePrincipal(principal): MaybePrincipal,
    MaybeVisitor(visitor): MaybeVisitor,
) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        authenticated: principal.is_some(),
        principal: principal.as_ref().map(CredentialResponse::from),
        visitor: visitor.as_ref().map(CredentialResponse::from),
    })
}

pub async fn redeem(
    State(state): State<AppState>,
    Principal(credential): Principal,
) -> Result<Json<RedeemResponse>, AppError> {
    let jti = credential
        .payload
        .extra
        .get("jti")
        .and_then(|v| v.as_str())
        .ok_or(AppError::NotAuthorized)?;

    let now_ms = Utc::now().timestamp_millis();
    let forget_after_ms =
        redeem_deadline(credential.payload.iat, state.jwt_validity_seconds, now_ms);

    if !state.redeemed.first_use(jti, forget_after_ms, now_ms) {
        tracing::warn!(jti = %jti, "one-time credential reused");
        return Err(signal_used_token());
    }

    Ok(Json(RedeemResponse {
        redeemed: jti.to_string(),
    }))
}
