use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::DecodedCredential;

use super::AuthCtx;

fn auth_ctx(parts: &Parts) -> Option<&AuthCtx> {
    parts.extensions.get::<AuthCtx>()
}

/// Handler で、 AuthCtx を受け取るための extractor
/// gate middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（ゲートがかかってない・ミドルウェア未設定）
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        auth_ctx(parts)
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::LoginRequired)
    }
}

/// 検証済みの principal が必須の handler 用
pub struct Principal(pub DecodedCredential);

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        auth_ctx(parts)
            .and_then(|ctx| ctx.principal.credential())
            .cloned()
            .map(Principal)
            .ok_or(AppError::LoginRequired)
    }
}

/// no-throw ゲートの後ろで使う。匿名 (None) を受け入れるかどうかは handler が決める
pub struct MaybePrincipal(pub Option<DecodedCredential>);

impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(
            auth_ctx(parts).and_then(|ctx| ctx.principal.credential().cloned()),
        ))
    }
}

pub struct MaybeVisitor(pub Option<DecodedCredential>);

impl<S> FromRequestParts<S> for MaybeVisitor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeVisitor(
            auth_ctx(parts).and_then(|ctx| ctx.visitor.credential().cloned()),
        ))
    }
}
