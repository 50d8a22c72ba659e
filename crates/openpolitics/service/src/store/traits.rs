//! Store contract
//!
//! Every method is a single statement against the backing store and a
//! potential suspension point. Uniqueness invariants that two racing
//! requests could both slip past an application-level pre-check are
//! enforced here, at the store boundary, and surfaced as typed
//! conflicts: one active party membership per user, one active alliance
//! membership per party, one active merge edge per child, one like per
//! `(party, user)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openpolitics_types::{
    Alliance, AllianceId, AllianceMemberRecord, Answer, CivicResult, EscalationRecord,
    MembershipRecord, MergeId, MergeRecord, Party, PartyId, PartyLike, PartySupport, Question,
    QuestionId, Revocation, TrustVote, UserId,
};

/// The relational store collaborator
#[async_trait]
pub trait CivicStore: Send + Sync {
    // --- Parties ---

    async fn insert_party(&self, party: &Party) -> CivicResult<()>;

    async fn party(&self, id: &PartyId) -> CivicResult<Option<Party>>;

    /// All parties, newest first
    async fn parties(&self) -> CivicResult<Vec<Party>>;

    // --- Memberships ---

    /// Insert an active membership row
    ///
    /// Fails with `AlreadyMember` when the user already has an active
    /// row in any party (store-boundary uniqueness).
    async fn insert_membership(&self, row: &MembershipRecord) -> CivicResult<()>;

    async fn active_membership(
        &self,
        party: &PartyId,
        user: &UserId,
    ) -> CivicResult<Option<MembershipRecord>>;

    async fn active_membership_for_user(
        &self,
        user: &UserId,
    ) -> CivicResult<Option<MembershipRecord>>;

    async fn active_memberships(&self, party: &PartyId) -> CivicResult<Vec<MembershipRecord>>;

    /// Count-only query over active membership rows
    async fn active_member_count(&self, party: &PartyId) -> CivicResult<u64>;

    /// Close the user's active row in the party; `false` when none exists
    async fn close_membership(
        &self,
        party: &PartyId,
        user: &UserId,
        left_at: DateTime<Utc>,
        feedback: Option<String>,
    ) -> CivicResult<bool>;

    // --- Trust votes ---

    async fn insert_vote(&self, vote: &TrustVote) -> CivicResult<()>;

    /// Delete all votes from a voter in a party, returning how many
    async fn delete_votes_from(&self, party: &PartyId, from: &UserId) -> CivicResult<u64>;

    /// All vote rows for a party, expired ones included
    async fn votes(&self, party: &PartyId) -> CivicResult<Vec<TrustVote>>;

    // --- Alliances ---

    async fn insert_alliance(&self, alliance: &Alliance) -> CivicResult<()>;

    /// Physically delete an alliance and its member rows
    ///
    /// Only used as the compensating rollback when member inserts fail
    /// mid-creation; idempotent and safe to retry.
    async fn delete_alliance(&self, id: &AllianceId) -> CivicResult<()>;

    async fn alliance(&self, id: &AllianceId) -> CivicResult<Option<Alliance>>;

    /// All alliance rows, newest first
    async fn alliances(&self) -> CivicResult<Vec<Alliance>>;

    /// Mark an alliance disbanded; `false` when it does not exist
    async fn set_alliance_disbanded(
        &self,
        id: &AllianceId,
        at: DateTime<Utc>,
    ) -> CivicResult<bool>;

    /// Insert an active alliance-member row
    ///
    /// Fails with `AlreadyAllied` when the party already has an active
    /// row in any alliance (store-boundary uniqueness).
    async fn insert_alliance_member(&self, row: &AllianceMemberRecord) -> CivicResult<()>;

    async fn active_alliance_members(
        &self,
        alliance: &AllianceId,
    ) -> CivicResult<Vec<AllianceMemberRecord>>;

    async fn active_alliance_membership(
        &self,
        party: &PartyId,
    ) -> CivicResult<Option<AllianceMemberRecord>>;

    /// Close one party's active row; `false` when none exists
    async fn close_alliance_member(
        &self,
        alliance: &AllianceId,
        party: &PartyId,
        at: DateTime<Utc>,
    ) -> CivicResult<bool>;

    /// Close every remaining active row, returning how many
    async fn close_all_alliance_members(
        &self,
        alliance: &AllianceId,
        at: DateTime<Utc>,
    ) -> CivicResult<u64>;

    // --- Supports and revocations ---

    async fn insert_support(&self, support: &PartySupport) -> CivicResult<()>;

    /// All support edges pointing at a party
    async fn supports_to(&self, party: &PartyId) -> CivicResult<Vec<PartySupport>>;

    async fn insert_revocation(&self, revocation: &Revocation) -> CivicResult<()>;

    /// All revocations naming a target
    async fn revocations_for_target(&self, target_id: &str) -> CivicResult<Vec<Revocation>>;

    // --- Escalations ---

    async fn insert_escalation(&self, escalation: &EscalationRecord) -> CivicResult<()>;

    async fn escalations_from(&self, party: &PartyId) -> CivicResult<Vec<EscalationRecord>>;

    // --- Merges ---

    /// Insert an active merge edge
    ///
    /// Fails with `AlreadyMerged` when the child already has an active
    /// edge (store-boundary uniqueness).
    async fn insert_merge(&self, merge: &MergeRecord) -> CivicResult<()>;

    async fn active_merge_for_child(&self, child: &PartyId) -> CivicResult<Option<MergeRecord>>;

    async fn active_merges(&self) -> CivicResult<Vec<MergeRecord>>;

    async fn active_merges_to_parent(&self, parent: &PartyId) -> CivicResult<Vec<MergeRecord>>;

    /// Close a merge edge; `false` when it is missing or already closed
    async fn close_merge(
        &self,
        id: &MergeId,
        at: DateTime<Utc>,
        by: &UserId,
    ) -> CivicResult<bool>;

    // --- Likes ---

    /// Insert a like; `false` when the unique `(party, user)` constraint
    /// rejected a duplicate (callers treat that as success)
    async fn insert_like(&self, like: &PartyLike) -> CivicResult<bool>;

    /// Delete a like; `false` when none existed
    async fn delete_like(&self, party: &PartyId, user: &UserId) -> CivicResult<bool>;

    async fn like_count(&self, party: &PartyId) -> CivicResult<u64>;

    // --- Questions and answers ---

    async fn insert_question(&self, question: &Question) -> CivicResult<()>;

    async fn question(&self, id: &QuestionId) -> CivicResult<Option<Question>>;

    /// A party's questions, newest first
    async fn questions(&self, party: &PartyId) -> CivicResult<Vec<Question>>;

    async fn insert_answer(&self, answer: &Answer) -> CivicResult<()>;

    async fn answers(&self, question: &QuestionId) -> CivicResult<Vec<Answer>>;
}
