//! Party merge edges
//!
//! A child party merges into exactly one parent at a time; the set of
//! active edges forms a forest, enforced by a cycle check at merge time.
//! Merging is asymmetric: children roll up into parents, never the
//! reverse.

use crate::{MergeId, PartyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An edge in the merge forest
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergeRecord {
    pub id: MergeId,
    pub child_party_id: PartyId,
    pub parent_party_id: PartyId,
    pub merged_at: DateTime<Utc>,
    /// The leader that initiated the merge
    pub merged_by: UserId,
    pub demerged_at: Option<DateTime<Utc>>,
    pub demerged_by: Option<UserId>,
}

impl MergeRecord {
    pub fn new(child_party_id: PartyId, parent_party_id: PartyId, merged_by: UserId) -> Self {
        Self {
            id: MergeId::generate(),
            child_party_id,
            parent_party_id,
            merged_at: Utc::now(),
            merged_by,
            demerged_at: None,
            demerged_by: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.demerged_at.is_none()
    }

    /// Close this edge, recording who demerged and when
    pub fn close(&mut self, demerged_at: DateTime<Utc>, demerged_by: UserId) {
        self.demerged_at = Some(demerged_at);
        self.demerged_by = Some(demerged_by);
    }
}

/// One row of a merge-subtree member breakdown
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberBreakdown {
    pub party_id: PartyId,
    pub issue_text: String,
    pub member_count: u64,
    /// True for the queried root party
    pub is_self: bool,
}

/// A party's position in the merge forest, as rendered
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergeStatus {
    /// The active edge to this party's parent, if merged
    pub current: Option<MergeRecord>,
    /// Active edges from children merged into this party
    pub children: Vec<MergeRecord>,
    /// One row per node of the subtree rooted here
    pub breakdown: Vec<MemberBreakdown>,
    /// Sum of `breakdown` member counts
    pub total_members: u64,
}
