//! Inter-party outreach: support, revocation, escalation
//!
//! All three are leader actions on the acting party, and all three are
//! append-only ledgers. Revoking never touches the support rows it
//! overrides, and escalating never hands an issue off.

use openpolitics_engine::{escalation, mark_revocations};
use openpolitics_types::{
    party_level, CivicResult, EscalationRecord, PartyId, PartySupport, Revocation, SupportView,
    TrailStep, UserId,
};
use tracing::info;

use super::CivicService;
use crate::store::CivicStore;

impl<S: CivicStore> CivicService<S> {
    /// Declare explicit support for another party's issue
    pub async fn support_party(
        &self,
        from: &PartyId,
        to: &PartyId,
        actor: &UserId,
    ) -> CivicResult<PartySupport> {
        self.require_party(from).await?;
        self.require_party(to).await?;
        self.require_leader(from, actor).await?;

        let support = PartySupport::explicit_issue(from.clone(), to.clone());
        self.store().insert_support(&support).await?;

        info!(from = %from.short(), to = %to.short(), "support declared");
        Ok(support)
    }

    /// Revoke previously declared support with a standing flag
    pub async fn revoke_support(
        &self,
        from: &PartyId,
        to: &PartyId,
        actor: &UserId,
        reason: Option<String>,
    ) -> CivicResult<Revocation> {
        self.require_party(from).await?;
        self.require_party(to).await?;
        self.require_leader(from, actor).await?;

        let revocation = Revocation::for_issue(from.clone(), to.clone(), reason);
        self.store().insert_revocation(&revocation).await?;

        info!(from = %from.short(), to = %to.short(), "support revoked");
        Ok(revocation)
    }

    /// All support edges pointing at a party, each with its revocation flag
    pub async fn supports_for(&self, party: &PartyId) -> CivicResult<Vec<SupportView>> {
        self.require_party(party).await?;
        let supports = self.store().supports_to(party).await?;
        let revocations = self.store().revocations_for_target(&party.0).await?;
        Ok(mark_revocations(supports, &revocations))
    }

    /// Point a party's issue at a larger party
    pub async fn escalate(
        &self,
        source: &PartyId,
        target: &PartyId,
        actor: &UserId,
    ) -> CivicResult<EscalationRecord> {
        self.require_party(source).await?;
        self.require_party(target).await?;
        self.require_leader(source, actor).await?;

        let record = EscalationRecord::new(source.clone(), target.clone());
        self.store().insert_escalation(&record).await?;

        info!(source = %source.short(), target = %target.short(), "issue escalated");
        Ok(record)
    }

    /// The escalation trail of a party's issue
    ///
    /// The origin party comes first with no escalation time, followed by
    /// one step per outgoing edge in creation order. Each step carries the
    /// target's live member count and size tier.
    pub async fn escalation_trail(&self, party: &PartyId) -> CivicResult<Vec<TrailStep>> {
        let origin = self.require_party(party).await?;
        let origin_count = self.store().active_member_count(party).await?;

        let mut trail = vec![TrailStep {
            party: origin,
            level: party_level(origin_count),
            member_count: origin_count,
            escalated_at: None,
        }];

        let edges = escalation::order_trail(self.store().escalations_from(party).await?);
        for edge in edges {
            let target = self.require_party(&edge.target_party_id).await?;
            let member_count = self.store().active_member_count(&target.id).await?;
            trail.push(TrailStep {
                party: target,
                level: party_level(member_count),
                member_count,
                escalated_at: Some(edge.created_at),
            });
        }
        Ok(trail)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{join_all, svc};
    use super::*;
    use crate::store::MemoryStore;
    use openpolitics_types::ErrorKind;

    async fn led_party(
        svc: &CivicService<MemoryStore>,
        issue: &str,
        n: usize,
    ) -> (PartyId, UserId) {
        let (party, members) = join_all(svc, issue, n).await;
        let leader = members[0].clone();
        svc.cast_trust_vote(&party, &leader, &leader).await.unwrap();
        (party, leader)
    }

    #[tokio::test]
    async fn test_support_is_a_leader_action() {
        let svc = svc();
        let (from, _) = join_all(&svc, "Small", 2).await;
        let (to, _) = join_all(&svc, "Big", 2).await;

        let err = svc
            .support_party(&from, &to, &UserId::new("nobody"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_revocation_flags_without_deleting() {
        let svc = svc();
        let (from, leader) = led_party(&svc, "Small", 2).await;
        let (to, _) = join_all(&svc, "Big", 2).await;

        svc.support_party(&from, &to, &leader).await.unwrap();
        let views = svc.supports_for(&to).await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(!views[0].is_revoked);

        svc.revoke_support(&from, &to, &leader, Some("position changed".into()))
            .await
            .unwrap();
        let views = svc.supports_for(&to).await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].is_revoked);

        // The standing revocation also covers renewed support.
        svc.support_party(&from, &to, &leader).await.unwrap();
        let views = svc.supports_for(&to).await.unwrap();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.is_revoked));
    }

    #[tokio::test]
    async fn test_trail_starts_at_origin_in_creation_order() {
        let svc = svc();
        let (source, leader) = led_party(&svc, "Ward pothole", 3).await;
        let (city, _) = join_all(&svc, "City roads", 4).await;
        let (state, _) = join_all(&svc, "State infra", 5).await;

        svc.escalate(&source, &city, &leader).await.unwrap();
        svc.escalate(&source, &state, &leader).await.unwrap();

        let trail = svc.escalation_trail(&source).await.unwrap();
        assert_eq!(trail.len(), 3);
        assert!(trail[0].escalated_at.is_none());
        assert_eq!(trail[0].party.id, source);
        assert_eq!(trail[1].party.id, city);
        assert_eq!(trail[1].member_count, 4);
        assert_eq!(trail[2].party.id, state);
        assert!(trail[1].escalated_at.unwrap() <= trail[2].escalated_at.unwrap());
    }

    #[tokio::test]
    async fn test_escalation_keeps_source_in_control() {
        let svc = svc();
        let (source, leader) = led_party(&svc, "Ward pothole", 2).await;
        let (city, _) = join_all(&svc, "City roads", 2).await;

        svc.escalate(&source, &city, &leader).await.unwrap();

        // The source leader can still act on the issue after escalating.
        svc.escalate(&source, &city, &leader).await.unwrap();
        let trail = svc.escalation_trail(&source).await.unwrap();
        assert_eq!(trail.len(), 3);

        // The target gains no outgoing trail from someone else's edge.
        let target_trail = svc.escalation_trail(&city).await.unwrap();
        assert_eq!(target_trail.len(), 1);
    }
}
