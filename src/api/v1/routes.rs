/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route ごとにどのゲート (strict / role / no-throw / visitor) を掛けるかをここで決める
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    health::health,
    session::{admin, me, redeem, whoami},
};
use crate::middleware::auth::{Gate, OnFailure, access};
use crate::services::auth::AuthFailure;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Result<Router<AppState>, AuthFailure> {
    let auth = state.auth.clone();
    let with_window = |gate: Gate| match state.jwt_validity_seconds {
        Some(seconds) => gate.with_validity_seconds(seconds),
        None => gate,
    };

    let strict: Router<AppState> = access::apply(
        Router::new()
            .route("/me", get(me))
            .route("/redeem", post(redeem)),
        with_window(Gate::verify(auth.clone(), OnFailure::Default)),
    );

    let admin_only: Router<AppState> = access::apply(
        Router::new().route("/admin", get(admin)),
        with_window(Gate::verify_with_role(
            auth.clone(),
            state.admin_role.clone(),
            OnFailure::Default,
        )?),
    );

    // principal と visitor は独立。両方のゲートを重ねる
    let optional: Router<AppState> = access::apply(
        access::apply(
            Router::new().route("/whoami", get(whoami)),
            with_window(Gate::verify_no_throw(auth.clone())),
        ),
        Gate::verify_visitor_no_throw(auth),
    );

    Ok(Router::new()
        .route("/health", get(health))
        .merge(strict)
        .merge(admin_only)
        .merge(optional))
}
