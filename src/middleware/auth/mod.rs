/*
 * Responsibility
 * - 認証ゲート (Gate) の定義と、Router への適用 (access::apply)
 */
pub mod access;
pub mod gate;

pub use gate::{FailureHandler, Flow, Gate, GateConfig, OnFailure};
