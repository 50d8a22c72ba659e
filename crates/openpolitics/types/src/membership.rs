//! Party membership rows
//!
//! Created on join, closed on leave, never deleted. A user has at most
//! one row with `left_at = None` across all parties; that invariant is
//! enforced at the store boundary.

use crate::{PartyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A membership row for one user in one party
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub party_id: PartyId,
    pub user_id: UserId,
    pub joined_at: DateTime<Utc>,
    /// Set when the member leaves; `None` while active
    pub left_at: Option<DateTime<Utc>>,
    /// Optional feedback captured when leaving
    pub leave_feedback: Option<String>,
}

impl MembershipRecord {
    /// Create a new active membership
    pub fn new(party_id: PartyId, user_id: UserId) -> Self {
        Self {
            party_id,
            user_id,
            joined_at: Utc::now(),
            left_at: None,
            leave_feedback: None,
        }
    }

    /// Whether this row is still active
    pub fn is_active(&self) -> bool {
        self.left_at.is_none()
    }

    /// Close this row, recording the leave time and optional feedback
    pub fn close(&mut self, left_at: DateTime<Utc>, feedback: Option<String>) {
        self.left_at = Some(left_at);
        self.leave_feedback = feedback;
    }
}
