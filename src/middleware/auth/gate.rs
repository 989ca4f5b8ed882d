//! Request gate: runs the credential pipeline for one request and decides pass/reject.
//!
//! Four flows share the same stages and differ only in what a failure does:
//!
//! | flow | failure before DECODED | missing role |
//! |---|---|---|
//! | `StrictVerify` | reject via failure handler | - |
//! | `StrictVerifyWithRole` | reject via failure handler | reject via failure handler |
//! | `NoThrowVerify` | principal = Absent, pass | - |
//! | `NoThrowVisitorVerify` | visitor = Absent, pass (reads `Visitor`) | - |
//!
//! Configuration failures (bad required role) skip the caller's handler and always
//! reject with the error factory's `not_authorized`.

use axum::http::{HeaderMap, HeaderName};
use axum::response::{IntoResponse, Response};
use std::{fmt, sync::Arc};
use tracing::{debug, error, warn};

use crate::api::v1::extractors::{AuthCtx, Slot, SlotTarget};
use crate::services::auth::extract::{AUTHORIZATION_HEADER, VISITOR_HEADER};
use crate::services::auth::pipeline::{Progress, Stage};
use crate::services::auth::{AuthFailure, AuthService};

/// Caller-supplied rejection. Whatever it returns is sent instead of running the handler.
pub type FailureHandler = Arc<dyn Fn(&AuthFailure) -> Response + Send + Sync>;

/// Which rejection a strict gate produces.
#[derive(Clone, Default)]
pub enum OnFailure {
    /// Error factory's `login_required`.
    #[default]
    Default,
    Custom(FailureHandler),
}

impl OnFailure {
    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&AuthFailure) -> Response + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(handler))
    }
}

impl fmt::Debug for OnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnFailure::Default => f.write_str("Default"),
            OnFailure::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    StrictVerify,
    StrictVerifyWithRole,
    NoThrowVerify,
    NoThrowVisitorVerify,
}

impl Flow {
    pub fn is_strict(&self) -> bool {
        matches!(self, Flow::StrictVerify | Flow::StrictVerifyWithRole)
    }

    pub fn target(&self) -> SlotTarget {
        match self {
            Flow::NoThrowVisitorVerify => SlotTarget::Visitor,
            _ => SlotTarget::Principal,
        }
    }

    pub fn header(&self) -> HeaderName {
        match self {
            Flow::NoThrowVisitorVerify => VISITOR_HEADER,
            _ => AUTHORIZATION_HEADER,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::StrictVerify => "strict-verify",
            Flow::StrictVerifyWithRole => "strict-verify-with-role",
            Flow::NoThrowVerify => "no-throw-verify",
            Flow::NoThrowVisitorVerify => "no-throw-visitor-verify",
        }
    }
}

/// Per-gate settings.
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    /// Only read by `StrictVerifyWithRole`.
    pub required_role: Option<String>,
    /// Only read by strict flows.
    pub on_failure: OnFailure,
    /// When set, credentials older than this are refused (strict) or dropped (no-throw).
    pub validity_seconds: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Gate {
    service: Arc<AuthService>,
    flow: Flow,
    config: GateConfig,
}

impl Gate {
    pub fn new(
        service: Arc<AuthService>,
        flow: Flow,
        config: GateConfig,
    ) -> Result<Self, AuthFailure> {
        if flow == Flow::StrictVerifyWithRole
            && config.required_role.as_deref().is_none_or(str::is_empty)
        {
            error!(flow = flow.as_str(), "gate configured without a required role");
            return Err(AuthFailure::Configuration(
                "required role must be a non-empty string",
            ));
        }

        Ok(Self {
            service,
            flow,
            config,
        })
    }

    /// Strict: reject any request without a valid `Authorization: Bearer` credential.
    pub fn verify(service: Arc<AuthService>, on_failure: OnFailure) -> Self {
        Self {
            service,
            flow: Flow::StrictVerify,
            config: GateConfig {
                on_failure,
                ..GateConfig::default()
            },
        }
    }

    /// Strict + the credential's `roles` must contain `role`.
    pub fn verify_with_role(
        service: Arc<AuthService>,
        role: impl Into<String>,
        on_failure: OnFailure,
    ) -> Result<Self, AuthFailure> {
        Self::new(
            service,
            Flow::StrictVerifyWithRole,
            GateConfig {
                required_role: Some(role.into()),
                on_failure,
                validity_seconds: None,
            },
        )
    }

    /// Never rejects; the principal slot ends up Verified or Absent.
    pub fn verify_no_throw(service: Arc<AuthService>) -> Self {
        Self {
            service,
            flow: Flow::NoThrowVerify,
            config: GateConfig::default(),
        }
    }

    /// Never rejects; reads the `Visitor` header into the visitor slot.
    pub fn verify_visitor_no_throw(service: Arc<AuthService>) -> Self {
        Self {
            service,
            flow: Flow::NoThrowVisitorVerify,
            config: GateConfig::default(),
        }
    }

    pub fn with_validity_seconds(mut self, validity_seconds: f64) -> Self {
        self.config.validity_seconds = Some(validity_seconds);
        self
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Run the pipeline for one request.
    ///
    /// `ctx` is taken by value and handed back on pass; on reject the caller gets the
    /// response to send instead of calling the next handler.
    pub async fn run(&self, headers: &HeaderMap, mut ctx: AuthCtx) -> Result<AuthCtx, Response> {
        let mut progress = Progress::new();
        let target = self.flow.target();

        let outcome = match self
            .service
            .authenticate(headers.get(self.flow.header()), &mut progress)
            .await
        {
            Ok(credential) => self.service.authorize(
                credential,
                self.config.validity_seconds,
                self.required_role(),
                &mut progress,
            ),
            Err(failure) => Err(failure),
        };

        let failure = match outcome {
            Ok(credential) => {
                progress.advance(Stage::Pass);
                ctx.assign(target, Slot::verified(credential));
                return Ok(ctx);
            }
            Err(failure) => failure,
        };

        let failed_after = progress.stage();

        if failure.is_configuration() {
            progress.advance(Stage::Rejected);
            error!(
                flow = self.flow.as_str(),
                stage = %failed_after,
                error = %failure,
                "gate misconfigured"
            );
            return Err(self.service.errors().not_authorized().into_response());
        }

        if self.flow.is_strict() {
            progress.advance(Stage::Rejected);
            warn!(
                flow = self.flow.as_str(),
                stage = %failed_after,
                kind = failure.kind(),
                error = %failure,
                "credential rejected"
            );
            return Err(self.reject(&failure));
        }

        debug!(
            flow = self.flow.as_str(),
            stage = %failed_after,
            kind = failure.kind(),
            error = %failure,
            "credential absent"
        );
        ctx.assign(target, Slot::Absent);
        progress.advance(Stage::Pass);
        Ok(ctx)
    }

    // A role flow never runs without a role check: a missing role becomes "" and
    // fails as a configuration error.
    fn required_role(&self) -> Option<&str> {
        match self.flow {
            Flow::StrictVerifyWithRole => {
                Some(self.config.required_role.as_deref().unwrap_or_default())
            }
            _ => None,
        }
    }

    fn reject(&self, failure: &AuthFailure) -> Response {
        match &self.config.on_failure {
            OnFailure::Default => self.service.errors().login_required().into_response(),
            OnFailure::Custom(handler) => handler(failure),
        }
    }
}
