/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 認証ゲートの拒否シグナル (login required / not authorized / used token) もここに集約する
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Default strict-mode rejection: the caller must (re-)authenticate.
    #[error("login required")]
    LoginRequired,
    /// The caller is authenticated but the gate refuses it, or the gate itself is misconfigured.
    #[error("not authorized")]
    NotAuthorized,
    /// One-time credential has already been consumed.
    #[error("used token")]
    UsedToken,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::LoginRequired => "LOGIN_REQUIRED",
            AppError::NotAuthorized => "NOT_AUTHORIZED",
            AppError::UsedToken => "USED_TOKEN",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::LoginRequired | AppError::UsedToken => StatusCode::UNAUTHORIZED,
            AppError::NotAuthorized => StatusCode::FORBIDDEN,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_signals_map_to_auth_statuses() {
        assert_eq!(AppError::LoginRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::UsedToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotAuthorized.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn into_response_keeps_status() {
        let res = AppError::Internal.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::UsedToken.code(), "USED_TOKEN");
    }
}
