//! Escalation trail rows
//!
//! A one-way pointer from a smaller party's issue toward a larger party.
//! Append-only, never updated or deleted; there is no handoff, only
//! linking, so the source party always stays in control of its issue.

use crate::{EscalationId, Party, PartyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directed escalation edge
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EscalationRecord {
    pub id: EscalationId,
    pub source_party_id: PartyId,
    pub target_party_id: PartyId,
    pub created_at: DateTime<Utc>,
}

impl EscalationRecord {
    pub fn new(source_party_id: PartyId, target_party_id: PartyId) -> Self {
        Self {
            id: EscalationId::generate(),
            source_party_id,
            target_party_id,
            created_at: Utc::now(),
        }
    }
}

/// One rendered step of an escalation trail
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrailStep {
    pub party: Party,
    pub member_count: u64,
    pub level: u8,
    /// `None` for the origin party
    pub escalated_at: Option<DateTime<Utc>>,
}
