//! Stages of a single gate run.
//!
//! ```text
//! START → EXTRACTED → FORMAT_OK → SIGNATURE_OK → DECODED → AUTHORIZED → PASS
//!   └──────────┴───────────┴────────────┴───────────┴──────────┴──→ REJECTED
//! ```
//!
//! `PASS` and `REJECTED` are terminal. No-throw flows still end in `PASS` after a failure,
//! with the identity slot marked absent.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Extracted,
    FormatOk,
    SignatureOk,
    Decoded,
    Authorized,
    Pass,
    Rejected,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Pass | Stage::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "START",
            Stage::Extracted => "EXTRACTED",
            Stage::FormatOk => "FORMAT_OK",
            Stage::SignatureOk => "SIGNATURE_OK",
            Stage::Decoded => "DECODED",
            Stage::Authorized => "AUTHORIZED",
            Stage::Pass => "PASS",
            Stage::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current stage of one run and traces every transition.
#[derive(Debug)]
pub struct Progress {
    stage: Stage,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self { stage: Stage::Start }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move forward. Leaving a terminal stage is a programming error and is ignored.
    pub fn advance(&mut self, next: Stage) {
        if self.stage.is_terminal() {
            tracing::error!(from = %self.stage, to = %next, "gate left a terminal stage");
            return;
        }
        tracing::trace!(from = %self.stage, to = %next, "gate stage");
        self.stage = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pass_and_rejected_are_terminal() {
        for stage in [
            Stage::Start,
            Stage::Extracted,
            Stage::FormatOk,
            Stage::SignatureOk,
            Stage::Decoded,
            Stage::Authorized,
        ] {
            assert!(!stage.is_terminal(), "{stage}");
        }
        assert!(Stage::Pass.is_terminal());
        assert!(Stage::Rejected.is_terminal());
    }

    #[test]
    fn terminal_stage_is_sticky() {
        let mut progress = Progress::new();
        progress.advance(Stage::Extracted);
        progress.advance(Stage::Rejected);
        progress.advance(Stage::Pass);
        assert_eq!(progress.stage(), Stage::Rejected);
    }

    #[test]
    fn display_uses_state_names() {
        assert_eq!(Stage::SignatureOk.to_string(), "SIGNATURE_OK");
    }
}
