/*
 * Responsibility
 * - 環境変数 (.env 含む) からゲートとサーバの設定を読む
 * - 公開鍵 PEM / アルゴリズム / 有効期限 / 管理者ロール
 * - 必須値が無い・読めない場合は起動失敗 (ConfigError)
 */
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("production") || raw.eq_ignore_ascii_case("prod") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub access_jwt_public_key_pem: String,
    pub access_jwt_algorithm: Algorithm,

    // None のときゲートは期限チェックをしない
    pub jwt_validity_seconds: Option<f64>,
    pub admin_role: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `lookup` は生の値を返す。空白だけの値は未設定として扱う
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };

        let app_env = get("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        // .env では改行を \n で書くので戻す
        let access_jwt_public_key_pem = get("ACCESS_JWT_PUBLIC_KEY_PEM")
            .ok_or(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let access_jwt_algorithm = match get("ACCESS_JWT_ALG") {
            Some(raw) => {
                Algorithm::from_str(&raw).map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALG"))?
            }
            None => Algorithm::EdDSA,
        };

        // 設定されている場合は正の有限値のみ。読めなければ起動失敗
        let jwt_validity_seconds = get("JWT_VALIDITY_SECONDS")
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite() && *s > 0.0)
                    .ok_or(ConfigError::Invalid("JWT_VALIDITY_SECONDS"))
            })
            .transpose()?;

        let admin_role = get("ADMIN_ROLE").unwrap_or_else(|| DEFAULT_ADMIN_ROLE.to_string());

        Ok(Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            app_env,
            cors_allowed_origins,
            access_jwt_public_key_pem,
            access_jwt_algorithm,
            jwt_validity_seconds,
            admin_role,
        })
    }
}
