/*
 * Responsibility
 * - tracing の初期化
 * - Config読み込み → AuthService 生成 → Router 組み立て
 * - Middleware の適用 (HTTP 共通 / CORS)
 * - axum::serve() で起動
 */
use anyhow::Result;
use axum::Router;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    services::auth::{AuthFailure, build_auth_service},
    state::AppState,
};

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env()?;
    let auth = build_auth_service(&config)?;
    let state = AppState::new(
        auth,
        config.admin_role.clone(),
        config.jwt_validity_seconds,
    );

    let app = middleware::cors::apply(build_router(state)?, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %config.addr,
        env = ?config.app_env,
        alg = ?config.access_jwt_algorithm,
        "listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// `/api/v1` + HTTP 共通 middleware。CORS は Config 依存なので run() 側で掛ける
pub fn build_router(state: AppState) -> Result<Router, AuthFailure> {
    let v1 = api::v1::routes(&state)?;
    let router = Router::new().nest("/api/v1", v1).with_state(state);
    Ok(middleware::http::apply(router))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "{}=debug,tower_http=debug,axum::rejection=trace",
                env!("CARGO_CRATE_NAME")
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));
}
