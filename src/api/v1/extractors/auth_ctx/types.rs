/*
 * Responsibility
 * - Handler から見える「認証コンテキスト」の型
 * - middleware (gate) が検証結果を slot に入れ、request extensions 経由で handler に渡す
 *
 * Notes
 * - principal と visitor は独立した slot。片方への代入はもう片方に影響しない
 * - Unset (まだ計算していない) と Absent (検証に失敗したので意図的に空) は区別する
 */

use crate::services::auth::DecodedCredential;

/// One identity channel of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Slot {
    /// No gate has run for this channel.
    #[default]
    Unset,
    /// A no-throw gate ran and the credential was missing or invalid.
    Absent,
    Verified(Box<DecodedCredential>),
}

impl Slot {
    pub fn verified(credential: DecodedCredential) -> Self {
        Self::Verified(Box::new(credential))
    }

    pub fn credential(&self) -> Option<&DecodedCredential> {
        match self {
            Slot::Verified(c) => Some(c.as_ref()),
            Slot::Unset | Slot::Absent => None,
        }
    }

    pub fn into_credential(self) -> Option<DecodedCredential> {
        match self {
            Slot::Verified(c) => Some(*c),
            Slot::Unset | Slot::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Slot::Absent)
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Slot::Unset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget {
    Principal,
    Visitor,
}

/// 認証ゲートが request extensions に載せるコンテキスト
///
/// - `principal`: `Authorization` ヘッダの主体
/// - `visitor`: `Visitor` ヘッダの匿名/低信頼の主体
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthCtx {
    pub principal: Slot,
    pub visitor: Slot,
}

impl AuthCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, target: SlotTarget, slot: Slot) {
        match target {
            SlotTarget::Principal => self.principal = slot,
            SlotTarget::Visitor => self.visitor = slot,
        }
    }

    pub fn slot(&self, target: SlotTarget) -> &Slot {
        match target {
            SlotTarget::Principal => &self.principal,
            SlotTarget::Visitor => &self.visitor,
        }
    }

    /// `client_id` claim of the verified principal.
    pub fn client_id(&self) -> Option<&str> {
        self.principal.credential().and_then(|c| c.client_id())
    }
}
