use crate::services::auth::claims::DecodedCredential;
use crate::services::auth::failure::AuthFailure;

/// Role membership check.
///
/// An absent or empty `required_role` is an integration bug, not a denial,
/// and is reported as `AuthFailure::Configuration`.
pub fn has_role(
    credential: &DecodedCredential,
    required_role: Option<&str>,
) -> Result<bool, AuthFailure> {
    let role = required_role
        .filter(|r| !r.is_empty())
        .ok_or(AuthFailure::Configuration("required role must be a non-empty string"))?;

    Ok(credential.roles().iter().any(|r| r == role))
}

/// Short role codes as issued in credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCode {
    Admin,
    ItemEditor,
    User,
}

impl RoleCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "ad" => Self::Admin,
            "ie" => Self::ItemEditor,
            _ => Self::User,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ItemEditor => "item editor",
            Self::User => "user",
        }
    }
}

pub fn admin_role_code() -> &'static str {
    "ad"
}

pub fn editor_role_code() -> &'static str {
    "ie"
}

pub fn role_name_from_code(code: &str) -> &'static str {
    RoleCode::from_code(code).name()
}
