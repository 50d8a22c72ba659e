//! Alliances between parties
//!
//! A non-binding, symmetric grouping of at least two parties. A party
//! holds at most one active alliance membership; an alliance is active
//! only while it has at least [`MIN_ALLIANCE_SIZE`] active member rows.

use crate::{AllianceId, PartyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of active member parties for an alliance to persist
pub const MIN_ALLIANCE_SIZE: usize = 2;

/// An alliance of parties
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Alliance {
    pub id: AllianceId,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set when the alliance is disbanded; `None` while active
    pub disbanded_at: Option<DateTime<Utc>>,
}

impl Alliance {
    pub fn new(name: Option<String>) -> Self {
        Self {
            id: AllianceId::generate(),
            name,
            created_at: Utc::now(),
            disbanded_at: None,
        }
    }

    /// Create with a specific ID (for testing or migration)
    pub fn with_id(mut self, id: AllianceId) -> Self {
        self.id = id;
        self
    }

    pub fn is_active(&self) -> bool {
        self.disbanded_at.is_none()
    }
}

/// One party's membership row in an alliance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllianceMemberRecord {
    pub alliance_id: AllianceId,
    pub party_id: PartyId,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

impl AllianceMemberRecord {
    pub fn new(alliance_id: AllianceId, party_id: PartyId) -> Self {
        Self {
            alliance_id,
            party_id,
            joined_at: Utc::now(),
            left_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.left_at.is_none()
    }
}

/// An active alliance with its active member rows
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllianceRoster {
    pub alliance: Alliance,
    pub members: Vec<AllianceMemberRecord>,
}

/// Outcome of a party leaving an alliance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceLeaveOutcome {
    /// Whether the departure dropped the alliance below the minimum and
    /// forced disbandment
    pub disbanded: bool,
}
