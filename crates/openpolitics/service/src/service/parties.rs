//! Party lifecycle: create, list, join, leave, member views

use chrono::Utc;
use openpolitics_engine::ballot;
use openpolitics_types::{
    party_level, CivicError, CivicResult, ErrorKind, MemberProfile, MembershipRecord, Party,
    PartyId, PartyStats, UserId,
};
use tracing::{info, warn};

use super::CivicService;
use crate::store::CivicStore;

/// Optional filters for the party listing
#[derive(Clone, Debug, Default)]
pub struct PartyFilter {
    pub pincode: Option<String>,
    pub min_level: Option<u8>,
}

impl PartyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pincode(mut self, pincode: impl Into<String>) -> Self {
        self.pincode = Some(pincode.into());
        self
    }

    pub fn with_min_level(mut self, level: u8) -> Self {
        self.min_level = Some(level);
        self
    }
}

impl<S: CivicStore> CivicService<S> {
    /// Create a new party and auto-join the creator
    pub async fn create_party(
        &self,
        actor: &UserId,
        issue_text: impl Into<String>,
        pincodes: Vec<String>,
    ) -> CivicResult<Party> {
        let party = Party::new(issue_text, pincodes, actor.clone())?;
        self.store().insert_party(&party).await?;

        // Auto-join; a creator already organizing elsewhere keeps the
        // party but stays where they are.
        let membership = MembershipRecord::new(party.id.clone(), actor.clone());
        match self.store().insert_membership(&membership).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::Conflict => {
                warn!(party = %party.id.short(), user = %actor.short(), "creator not auto-joined: {}", err);
            }
            Err(err) => return Err(err),
        }

        info!(party = %party.id.short(), user = %actor.short(), "party created");
        Ok(party)
    }

    /// List parties, newest first, enriched with derived stats
    pub async fn list_parties(&self, filter: &PartyFilter) -> CivicResult<Vec<PartyStats>> {
        let mut result = Vec::new();
        for party in self.store().parties().await? {
            if let Some(pincode) = &filter.pincode {
                if !party.covers_pincode(pincode) {
                    continue;
                }
            }
            let stats = self.party_stats(&party.id).await?;
            if let Some(min_level) = filter.min_level {
                if stats.level < min_level {
                    continue;
                }
            }
            result.push(stats);
        }
        Ok(result)
    }

    /// Derived read-time statistics for one party
    pub async fn party_stats(&self, id: &PartyId) -> CivicResult<PartyStats> {
        let party = self.require_party(id).await?;
        let member_count = self.store().active_member_count(id).await?;
        let leader = self.leader_of(id).await?;
        let like_count = self.store().like_count(id).await?;
        let unanswered_questions = self
            .party_questions(id)
            .await?
            .iter()
            .filter(|q| q.answers.is_empty())
            .count() as u64;

        Ok(PartyStats {
            level: party_level(member_count),
            party,
            member_count,
            leader,
            like_count,
            unanswered_questions,
        })
    }

    /// Join a party
    ///
    /// A user belongs to at most one party at a time; the store enforces
    /// the same constraint against racing joins.
    pub async fn join_party(
        &self,
        party: &PartyId,
        actor: &UserId,
    ) -> CivicResult<MembershipRecord> {
        self.require_party(party).await?;

        if self
            .store()
            .active_membership_for_user(actor)
            .await?
            .is_some()
        {
            return Err(CivicError::AlreadyMember(actor.clone()));
        }

        let membership = MembershipRecord::new(party.clone(), actor.clone());
        self.store().insert_membership(&membership).await?;

        info!(party = %party.short(), user = %actor.short(), "member joined");
        Ok(membership)
    }

    /// Leave a party, deleting the leaver's outgoing trust votes
    pub async fn leave_party(
        &self,
        party: &PartyId,
        actor: &UserId,
        feedback: Option<String>,
    ) -> CivicResult<()> {
        self.require_party(party).await?;

        let closed = self
            .store()
            .close_membership(party, actor, Utc::now(), feedback)
            .await?;
        if !closed {
            return Err(CivicError::NotAMember {
                party: party.clone(),
                user: actor.clone(),
            });
        }

        self.store().delete_votes_from(party, actor).await?;
        info!(party = %party.short(), user = %actor.short(), "member left");
        Ok(())
    }

    /// Active members with their trust-vote tallies and leader flag
    pub async fn members_with_votes(&self, party: &PartyId) -> CivicResult<Vec<MemberProfile>> {
        self.require_party(party).await?;
        let now = Utc::now();
        let votes = self.store().votes(party).await?;
        let counts = ballot::tally(&votes, now);
        let leader = ballot::leader(&votes, now);

        let mut members: Vec<MemberProfile> = self
            .store()
            .active_memberships(party)
            .await?
            .into_iter()
            .map(|m| MemberProfile {
                trust_votes: counts.get(&m.user_id).copied().unwrap_or(0),
                is_leader: leader.as_ref() == Some(&m.user_id),
                user_id: m.user_id,
                joined_at: m.joined_at,
            })
            .collect();
        members.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{join_all, svc};
    use super::*;
    use openpolitics_types::ErrorKind;

    #[tokio::test]
    async fn test_create_party_auto_joins_creator() {
        let svc = svc();
        let creator = UserId::new("creator");
        let party = svc
            .create_party(&creator, "Fix the lake", vec!["560001".into()])
            .await
            .unwrap();

        let stats = svc.party_stats(&party.id).await.unwrap();
        assert_eq!(stats.member_count, 1);
        assert_eq!(stats.level, 1);
    }

    #[tokio::test]
    async fn test_create_party_rejects_bad_input() {
        let svc = svc();
        let creator = UserId::new("creator");

        let err = svc
            .create_party(&creator, "", vec!["560001".into()])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let err = svc
            .create_party(&creator, "ok", vec!["56".into()])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn test_single_active_membership_across_parties() {
        let svc = svc();
        let a = svc
            .create_party(&UserId::new("fa"), "Issue A", vec!["560001".into()])
            .await
            .unwrap();
        let b = svc
            .create_party(&UserId::new("fb"), "Issue B", vec!["560002".into()])
            .await
            .unwrap();

        let user = UserId::new("joiner");
        svc.join_party(&a.id, &user).await.unwrap();

        let err = svc.join_party(&b.id, &user).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        svc.leave_party(&a.id, &user, None).await.unwrap();
        svc.join_party(&b.id, &user).await.unwrap();
    }

    #[tokio::test]
    async fn test_leave_requires_active_membership() {
        let svc = svc();
        let party = svc
            .create_party(&UserId::new("f"), "Issue", vec!["560001".into()])
            .await
            .unwrap();

        let err = svc
            .leave_party(&party.id, &UserId::new("stranger"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_list_parties_filters() {
        let svc = svc();
        let a = svc
            .create_party(&UserId::new("fa"), "Issue A", vec!["560001".into()])
            .await
            .unwrap();
        svc.create_party(&UserId::new("fb"), "Issue B", vec!["110001".into()])
            .await
            .unwrap();

        let by_pincode = svc
            .list_parties(&PartyFilter::new().with_pincode("560001"))
            .await
            .unwrap();
        assert_eq!(by_pincode.len(), 1);
        assert_eq!(by_pincode[0].party.id, a.id);

        // Both parties are tiny, so a high level floor filters everything.
        let by_level = svc
            .list_parties(&PartyFilter::new().with_min_level(2))
            .await
            .unwrap();
        assert!(by_level.is_empty());
    }

    #[tokio::test]
    async fn test_members_view_marks_leader() {
        let svc = svc();
        let (party, members) = join_all(&svc, "Issue", 3).await;
        svc.cast_trust_vote(&party, &members[1], &members[0])
            .await
            .unwrap();

        let view = svc.members_with_votes(&party).await.unwrap();
        let leader_row = view.iter().find(|m| m.user_id == members[0]).unwrap();
        assert!(leader_row.is_leader);
        assert_eq!(leader_row.trust_votes, 1);
        assert_eq!(view.iter().filter(|m| m.is_leader).count(), 1);
    }
}
