//! Trust votes
//!
//! A trust vote is a time-limited endorsement from one member to another
//! within a party. Votes lapse at `expires_at` without explicit action;
//! expiry is filtered at read time, never swept.

use crate::{PartyId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a trust vote stays valid after casting
pub const VOTE_VALIDITY_DAYS: i64 = 90;

/// A trust vote from one member to another
///
/// At most one non-expired vote per `(party_id, from_user_id)`: casting a
/// new vote retires the previous one from the same voter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrustVote {
    pub party_id: PartyId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// `created_at` + [`VOTE_VALIDITY_DAYS`]
    pub expires_at: DateTime<Utc>,
}

impl TrustVote {
    /// Cast a vote now, valid for [`VOTE_VALIDITY_DAYS`]
    pub fn cast(party_id: PartyId, from_user_id: UserId, to_user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            party_id,
            from_user_id,
            to_user_id,
            created_at: now,
            expires_at: now + Duration::days(VOTE_VALIDITY_DAYS),
        }
    }

    /// Whether the vote still counts at the given reference time
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
