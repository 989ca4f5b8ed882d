/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証ゲートの結果（AuthCtx）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - AuthCtx / Slot / SlotTarget
 * - AuthCtxExtractor / Principal / MaybePrincipal / MaybeVisitor
 */

mod core;
mod types;

pub use core::{AuthCtxExtractor, MaybePrincipal, MaybeVisitor, Principal};
pub use types::{AuthCtx, Slot, SlotTarget};
