//! In-memory store for development and testing.
//!
//! Implements [`CivicStore`] over concurrent maps. Each uniqueness
//! constraint is backed by its own index map and claimed through a
//! single `entry` call, so two racing inserts resolve to one winner and
//! one typed conflict, the same outcome a relational backend gets from a
//! unique index. The indexes are process-local, so this store is still
//! not suitable as a shared production backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use openpolitics_types::{
    Alliance, AllianceId, AllianceMemberRecord, Answer, CivicError, CivicResult,
    EscalationRecord, MembershipRecord, MergeId, MergeRecord, Party, PartyId, PartyLike,
    PartySupport, Question, QuestionId, Revocation, TrustVote, UserId,
};

use super::traits::CivicStore;

/// In-memory [`CivicStore`] implementation
#[derive(Default)]
pub struct MemoryStore {
    parties: DashMap<PartyId, Party>,
    /// Membership rows per party, full history
    memberships: DashMap<PartyId, Vec<MembershipRecord>>,
    votes: DashMap<PartyId, Vec<TrustVote>>,
    alliances: DashMap<AllianceId, Alliance>,
    alliance_members: DashMap<AllianceId, Vec<AllianceMemberRecord>>,
    /// Unique index: user -> party of their one active membership row
    active_members: DashMap<UserId, PartyId>,
    /// Unique index: party -> alliance of its one active member row
    allied_parties: DashMap<PartyId, AllianceId>,
    /// Unique index: child party -> its one active merge edge
    merged_children: DashMap<PartyId, MergeId>,
    /// Support edges keyed by the supported party
    supports: DashMap<PartyId, Vec<PartySupport>>,
    /// Revocations keyed by target id
    revocations: DashMap<String, Vec<Revocation>>,
    /// Escalation edges keyed by the source party
    escalations: DashMap<PartyId, Vec<EscalationRecord>>,
    merges: DashMap<MergeId, MergeRecord>,
    likes: DashMap<(PartyId, UserId), PartyLike>,
    questions: DashMap<QuestionId, Question>,
    answers: DashMap<QuestionId, Vec<Answer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CivicStore for MemoryStore {
    async fn insert_party(&self, party: &Party) -> CivicResult<()> {
        self.parties.insert(party.id.clone(), party.clone());
        Ok(())
    }

    async fn party(&self, id: &PartyId) -> CivicResult<Option<Party>> {
        Ok(self.parties.get(id).map(|p| p.clone()))
    }

    async fn parties(&self) -> CivicResult<Vec<Party>> {
        let mut all: Vec<Party> = self.parties.iter().map(|p| p.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn insert_membership(&self, row: &MembershipRecord) -> CivicResult<()> {
        // Claim the per-user slot atomically; the row lands only after
        // the claim holds, so racing joins get exactly one winner.
        match self.active_members.entry(row.user_id.clone()) {
            Entry::Occupied(_) => Err(CivicError::AlreadyMember(row.user_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(row.party_id.clone());
                self.memberships
                    .entry(row.party_id.clone())
                    .or_default()
                    .push(row.clone());
                Ok(())
            }
        }
    }

    async fn active_membership(
        &self,
        party: &PartyId,
        user: &UserId,
    ) -> CivicResult<Option<MembershipRecord>> {
        Ok(self.memberships.get(party).and_then(|rows| {
            rows.iter()
                .find(|m| m.user_id == *user && m.is_active())
                .cloned()
        }))
    }

    async fn active_membership_for_user(
        &self,
        user: &UserId,
    ) -> CivicResult<Option<MembershipRecord>> {
        let Some(party) = self.active_members.get(user).map(|p| p.clone()) else {
            return Ok(None);
        };
        Ok(self.memberships.get(&party).and_then(|rows| {
            rows.iter()
                .find(|m| m.user_id == *user && m.is_active())
                .cloned()
        }))
    }

    async fn active_memberships(&self, party: &PartyId) -> CivicResult<Vec<MembershipRecord>> {
        Ok(self
            .memberships
            .get(party)
            .map(|rows| rows.iter().filter(|m| m.is_active()).cloned().collect())
            .unwrap_or_default())
    }

    async fn active_member_count(&self, party: &PartyId) -> CivicResult<u64> {
        Ok(self
            .memberships
            .get(party)
            .map(|rows| rows.iter().filter(|m| m.is_active()).count() as u64)
            .unwrap_or(0))
    }

    async fn close_membership(
        &self,
        party: &PartyId,
        user: &UserId,
        left_at: DateTime<Utc>,
        feedback: Option<String>,
    ) -> CivicResult<bool> {
        let mut closed = false;
        if let Some(mut rows) = self.memberships.get_mut(party) {
            if let Some(row) = rows
                .iter_mut()
                .find(|m| m.user_id == *user && m.is_active())
            {
                row.close(left_at, feedback);
                closed = true;
            }
        }
        if closed {
            self.active_members.remove_if(user, |_, p| p == party);
        }
        Ok(closed)
    }

    async fn insert_vote(&self, vote: &TrustVote) -> CivicResult<()> {
        self.votes
            .entry(vote.party_id.clone())
            .or_default()
            .push(vote.clone());
        Ok(())
    }

    async fn delete_votes_from(&self, party: &PartyId, from: &UserId) -> CivicResult<u64> {
        let mut deleted = 0;
        if let Some(mut rows) = self.votes.get_mut(party) {
            let before = rows.len();
            rows.retain(|v| v.from_user_id != *from);
            deleted = (before - rows.len()) as u64;
        }
        Ok(deleted)
    }

    async fn votes(&self, party: &PartyId) -> CivicResult<Vec<TrustVote>> {
        Ok(self
            .votes
            .get(party)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn insert_alliance(&self, alliance: &Alliance) -> CivicResult<()> {
        self.alliances.insert(alliance.id.clone(), alliance.clone());
        Ok(())
    }

    async fn delete_alliance(&self, id: &AllianceId) -> CivicResult<()> {
        // Cascade member rows, mirroring the foreign-key behavior of the
        // relational backend, and release their uniqueness claims.
        self.alliances.remove(id);
        if let Some((_, rows)) = self.alliance_members.remove(id) {
            for row in rows.iter().filter(|m| m.is_active()) {
                self.allied_parties.remove_if(&row.party_id, |_, a| a == id);
            }
        }
        Ok(())
    }

    async fn alliance(&self, id: &AllianceId) -> CivicResult<Option<Alliance>> {
        Ok(self.alliances.get(id).map(|a| a.clone()))
    }

    async fn alliances(&self) -> CivicResult<Vec<Alliance>> {
        let mut all: Vec<Alliance> = self.alliances.iter().map(|a| a.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn set_alliance_disbanded(
        &self,
        id: &AllianceId,
        at: DateTime<Utc>,
    ) -> CivicResult<bool> {
        match self.alliances.get_mut(id) {
            Some(mut alliance) => {
                if alliance.disbanded_at.is_none() {
                    alliance.disbanded_at = Some(at);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_alliance_member(&self, row: &AllianceMemberRecord) -> CivicResult<()> {
        match self.allied_parties.entry(row.party_id.clone()) {
            Entry::Occupied(_) => Err(CivicError::AlreadyAllied(row.party_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(row.alliance_id.clone());
                self.alliance_members
                    .entry(row.alliance_id.clone())
                    .or_default()
                    .push(row.clone());
                Ok(())
            }
        }
    }

    async fn active_alliance_members(
        &self,
        alliance: &AllianceId,
    ) -> CivicResult<Vec<AllianceMemberRecord>> {
        Ok(self
            .alliance_members
            .get(alliance)
            .map(|rows| rows.iter().filter(|m| m.is_active()).cloned().collect())
            .unwrap_or_default())
    }

    async fn active_alliance_membership(
        &self,
        party: &PartyId,
    ) -> CivicResult<Option<AllianceMemberRecord>> {
        let Some(alliance) = self.allied_parties.get(party).map(|a| a.clone()) else {
            return Ok(None);
        };
        Ok(self.alliance_members.get(&alliance).and_then(|rows| {
            rows.iter()
                .find(|m| m.party_id == *party && m.is_active())
                .cloned()
        }))
    }

    async fn close_alliance_member(
        &self,
        alliance: &AllianceId,
        party: &PartyId,
        at: DateTime<Utc>,
    ) -> CivicResult<bool> {
        let mut closed = false;
        if let Some(mut rows) = self.alliance_members.get_mut(alliance) {
            if let Some(row) = rows
                .iter_mut()
                .find(|m| m.party_id == *party && m.is_active())
            {
                row.left_at = Some(at);
                closed = true;
            }
        }
        if closed {
            self.allied_parties.remove_if(party, |_, a| a == alliance);
        }
        Ok(closed)
    }

    async fn close_all_alliance_members(
        &self,
        alliance: &AllianceId,
        at: DateTime<Utc>,
    ) -> CivicResult<u64> {
        let mut closed = 0;
        let mut freed = Vec::new();
        if let Some(mut rows) = self.alliance_members.get_mut(alliance) {
            for row in rows.iter_mut().filter(|m| m.is_active()) {
                row.left_at = Some(at);
                freed.push(row.party_id.clone());
                closed += 1;
            }
        }
        for party in freed {
            self.allied_parties.remove_if(&party, |_, a| a == alliance);
        }
        Ok(closed)
    }

    async fn insert_support(&self, support: &PartySupport) -> CivicResult<()> {
        self.supports
            .entry(support.to_party_id.clone())
            .or_default()
            .push(support.clone());
        Ok(())
    }

    async fn supports_to(&self, party: &PartyId) -> CivicResult<Vec<PartySupport>> {
        Ok(self
            .supports
            .get(party)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn insert_revocation(&self, revocation: &Revocation) -> CivicResult<()> {
        self.revocations
            .entry(revocation.target_id.clone())
            .or_default()
            .push(revocation.clone());
        Ok(())
    }

    async fn revocations_for_target(&self, target_id: &str) -> CivicResult<Vec<Revocation>> {
        Ok(self
            .revocations
            .get(target_id)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn insert_escalation(&self, escalation: &EscalationRecord) -> CivicResult<()> {
        self.escalations
            .entry(escalation.source_party_id.clone())
            .or_default()
            .push(escalation.clone());
        Ok(())
    }

    async fn escalations_from(&self, party: &PartyId) -> CivicResult<Vec<EscalationRecord>> {
        Ok(self
            .escalations
            .get(party)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn insert_merge(&self, merge: &MergeRecord) -> CivicResult<()> {
        match self.merged_children.entry(merge.child_party_id.clone()) {
            Entry::Occupied(_) => Err(CivicError::AlreadyMerged(merge.child_party_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(merge.id.clone());
                self.merges.insert(merge.id.clone(), merge.clone());
                Ok(())
            }
        }
    }

    async fn active_merge_for_child(&self, child: &PartyId) -> CivicResult<Option<MergeRecord>> {
        let Some(id) = self.merged_children.get(child).map(|m| m.clone()) else {
            return Ok(None);
        };
        Ok(self
            .merges
            .get(&id)
            .filter(|e| e.is_active())
            .map(|e| e.clone()))
    }

    async fn active_merges(&self) -> CivicResult<Vec<MergeRecord>> {
        Ok(self
            .merges
            .iter()
            .filter(|e| e.is_active())
            .map(|e| e.clone())
            .collect())
    }

    async fn active_merges_to_parent(&self, parent: &PartyId) -> CivicResult<Vec<MergeRecord>> {
        Ok(self
            .merges
            .iter()
            .filter(|e| e.parent_party_id == *parent && e.is_active())
            .map(|e| e.clone())
            .collect())
    }

    async fn close_merge(
        &self,
        id: &MergeId,
        at: DateTime<Utc>,
        by: &UserId,
    ) -> CivicResult<bool> {
        let child = match self.merges.get_mut(id) {
            Some(mut edge) if edge.is_active() => {
                edge.close(at, by.clone());
                edge.child_party_id.clone()
            }
            _ => return Ok(false),
        };
        self.merged_children.remove_if(&child, |_, m| m == id);
        Ok(true)
    }

    async fn insert_like(&self, like: &PartyLike) -> CivicResult<bool> {
        match self
            .likes
            .entry((like.party_id.clone(), like.user_id.clone()))
        {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(like.clone());
                Ok(true)
            }
        }
    }

    async fn delete_like(&self, party: &PartyId, user: &UserId) -> CivicResult<bool> {
        Ok(self
            .likes
            .remove(&(party.clone(), user.clone()))
            .is_some())
    }

    async fn like_count(&self, party: &PartyId) -> CivicResult<u64> {
        Ok(self.likes.iter().filter(|l| l.party_id == *party).count() as u64)
    }

    async fn insert_question(&self, question: &Question) -> CivicResult<()> {
        self.questions.insert(question.id.clone(), question.clone());
        Ok(())
    }

    async fn question(&self, id: &QuestionId) -> CivicResult<Option<Question>> {
        Ok(self.questions.get(id).map(|q| q.clone()))
    }

    async fn questions(&self, party: &PartyId) -> CivicResult<Vec<Question>> {
        let mut rows: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.party_id == *party)
            .map(|q| q.clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_answer(&self, answer: &Answer) -> CivicResult<()> {
        self.answers
            .entry(answer.question_id.clone())
            .or_default()
            .push(answer.clone());
        Ok(())
    }

    async fn answers(&self, question: &QuestionId) -> CivicResult<Vec<Answer>> {
        Ok(self
            .answers
            .get(question)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }
}
