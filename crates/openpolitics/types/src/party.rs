//! Party identity and size-tier classification
//!
//! A party is a single-issue group scoped to a set of postal pincodes.
//! Immutable after creation except via merge-tree edges.

use crate::{CivicError, CivicResult, PartyId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum issue text length, in characters
pub const ISSUE_TEXT_MAX_CHARS: usize = 280;

/// Required pincode length (6 ASCII digits)
pub const PINCODE_LEN: usize = 6;

/// A single-issue party
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Party {
    /// Unique party identity
    pub id: PartyId,
    /// The issue this party organizes around
    pub issue_text: String,
    /// Postal areas the party covers (non-empty, 6-digit codes)
    pub pincodes: Vec<String>,
    /// The user that created this party
    pub created_by: UserId,
    /// When the party was created
    pub created_at: DateTime<Utc>,
}

impl Party {
    /// Create a new party, validating issue text and pincodes
    pub fn new(
        issue_text: impl Into<String>,
        pincodes: Vec<String>,
        created_by: UserId,
    ) -> CivicResult<Self> {
        let issue_text = issue_text.into();
        validate_issue_text(&issue_text)?;
        validate_pincodes(&pincodes)?;
        Ok(Self {
            id: PartyId::generate(),
            issue_text,
            pincodes,
            created_by,
            created_at: Utc::now(),
        })
    }

    /// Create with a specific ID (for testing or migration)
    pub fn with_id(mut self, id: PartyId) -> Self {
        self.id = id;
        self
    }

    /// Whether the party covers the given pincode
    pub fn covers_pincode(&self, pincode: &str) -> bool {
        self.pincodes.iter().any(|p| p == pincode)
    }
}

/// Validate issue text: required, at most [`ISSUE_TEXT_MAX_CHARS`] chars
pub fn validate_issue_text(text: &str) -> CivicResult<()> {
    if text.trim().is_empty() {
        return Err(CivicError::IssueTextInvalid("issue text is required".into()));
    }
    let len = text.chars().count();
    if len > ISSUE_TEXT_MAX_CHARS {
        return Err(CivicError::IssueTextInvalid(format!(
            "issue text must be {} characters or less, got {}",
            ISSUE_TEXT_MAX_CHARS, len
        )));
    }
    Ok(())
}

/// Validate a pincode set: non-empty, each exactly 6 ASCII digits
pub fn validate_pincodes(pincodes: &[String]) -> CivicResult<()> {
    if pincodes.is_empty() {
        return Err(CivicError::PincodeInvalid(
            "at least one pincode is required".into(),
        ));
    }
    for pincode in pincodes {
        if pincode.len() != PINCODE_LEN || !pincode.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CivicError::PincodeInvalid(format!(
                "'{}' is not a 6-digit pincode",
                pincode
            )));
        }
    }
    Ok(())
}

/// Map an active member count to the party's discrete size tier (1–4)
///
/// Inclusive upper bounds: 1 ⇒ ≤10, 2 ⇒ ≤100, 3 ⇒ ≤1000, 4 ⇒ >1000.
/// Total and deterministic.
pub fn party_level(member_count: u64) -> u8 {
    if member_count <= 10 {
        1
    } else if member_count <= 100 {
        2
    } else if member_count <= 1000 {
        3
    } else {
        4
    }
}

/// A party enriched with derived read-time statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartyStats {
    pub party: Party,
    /// Active member count (this party only, merges excluded)
    pub member_count: u64,
    /// Size tier derived from `member_count`
    pub level: u8,
    /// Current leader by trust-vote tally, if any
    pub leader: Option<UserId>,
    /// Number of likes
    pub like_count: u64,
    /// Questions with no answer yet
    pub unanswered_questions: u64,
}

/// Per-member view with trust-vote tally
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberProfile {
    pub user_id: UserId,
    pub joined_at: DateTime<Utc>,
    /// Active trust votes received
    pub trust_votes: u32,
    pub is_leader: bool,
}
