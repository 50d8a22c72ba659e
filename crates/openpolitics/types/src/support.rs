//! Support and revocation ledger rows
//!
//! Directed support edges between parties, and standing revocations that
//! suppress matching supports at render time. Both are append-only;
//! revocation never mutates or deletes the support row it overrides.

use crate::{PartyId, RevocationId, SupportId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the support was given
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportType {
    /// Direct, deliberate support
    Explicit,
    /// Derived support (e.g. via an alliance)
    Implicit,
}

/// What the support or revocation targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Issue,
    Question,
}

/// A directed support edge between parties
///
/// Many edges are allowed per pair over time; a repeated identical edge
/// represents renewed support, not a duplicate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartySupport {
    pub id: SupportId,
    pub from_party_id: PartyId,
    pub to_party_id: PartyId,
    pub support_type: SupportType,
    pub target_type: TargetType,
    pub target_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl PartySupport {
    /// Explicit support for another party's issue
    pub fn explicit_issue(from_party_id: PartyId, to_party_id: PartyId) -> Self {
        let target = to_party_id.0.clone();
        Self {
            id: SupportId::generate(),
            from_party_id,
            to_party_id,
            support_type: SupportType::Explicit,
            target_type: TargetType::Issue,
            target_id: Some(target),
            created_at: Utc::now(),
            expires_at: None,
        }
    }
}

/// A standing revocation overriding matching support edges
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Revocation {
    pub id: RevocationId,
    /// The party whose issue the revocation concerns
    pub party_id: PartyId,
    /// The party withdrawing its support
    pub revoking_party_id: PartyId,
    pub target_type: TargetType,
    pub target_id: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Revocation {
    /// Revoke previously given issue support
    pub fn for_issue(
        revoking_party_id: PartyId,
        target_party_id: PartyId,
        reason: Option<String>,
    ) -> Self {
        let target = target_party_id.0.clone();
        Self {
            id: RevocationId::generate(),
            party_id: target_party_id,
            revoking_party_id,
            target_type: TargetType::Issue,
            target_id: target,
            reason,
            created_at: Utc::now(),
        }
    }
}

/// A support edge as rendered: the row plus its revocation flag
///
/// `is_revoked` is a display-time join, not a state mutation of the
/// underlying support row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SupportView {
    pub support: PartySupport,
    pub is_revoked: bool,
}
