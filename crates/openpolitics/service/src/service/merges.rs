//! Merge-tree actions
//!
//! Merging is a leader action on the child party: the child rolls its
//! member count up into the parent. Cycle prevention rebuilds the forest
//! from the active edges on every merge attempt.

use chrono::Utc;
use openpolitics_types::{
    CivicError, CivicResult, MemberBreakdown, MergeRecord, MergeStatus, PartyId, UserId,
};
use openpolitics_engine::MergeForest;
use tracing::info;

use super::CivicService;
use crate::store::CivicStore;

impl<S: CivicStore> CivicService<S> {
    /// Merge `child` into `parent`, led by the child's current leader
    pub async fn merge_party(
        &self,
        child: &PartyId,
        parent: &PartyId,
        actor: &UserId,
    ) -> CivicResult<MergeRecord> {
        if child == parent {
            return Err(CivicError::SelfMerge(child.clone()));
        }
        self.require_party(child).await?;
        self.require_party(parent).await?;
        self.require_leader(child, actor).await?;

        if let Some(existing) = self.store().active_merge_for_child(child).await? {
            info!(child = %child.short(), parent = %existing.parent_party_id.short(), "merge rejected, child already merged");
            return Err(CivicError::AlreadyMerged(child.clone()));
        }

        let forest = MergeForest::from_edges(&self.store().active_merges().await?);
        if forest.would_create_cycle(child, parent) {
            return Err(CivicError::CycleDetected {
                child: child.clone(),
                parent: parent.clone(),
            });
        }

        let merge = MergeRecord::new(child.clone(), parent.clone(), actor.clone());
        self.store().insert_merge(&merge).await?;

        info!(child = %child.short(), parent = %parent.short(), by = %actor.short(), "parties merged");
        Ok(merge)
    }

    /// Undo a child party's active merge
    ///
    /// Allowed for the member that initiated the merge or the child's
    /// current leader.
    pub async fn demerge_party(&self, child: &PartyId, actor: &UserId) -> CivicResult<()> {
        self.require_party(child).await?;

        let merge = self
            .store()
            .active_merge_for_child(child)
            .await?
            .ok_or_else(|| CivicError::NotMerged(child.clone()))?;

        if &merge.merged_by != actor && self.leader_of(child).await?.as_ref() != Some(actor) {
            return Err(CivicError::Unauthorized(format!(
                "only the merge initiator or the current leader of party {} may demerge",
                child.short()
            )));
        }

        self.store().close_merge(&merge.id, Utc::now(), actor).await?;
        info!(child = %child.short(), parent = %merge.parent_party_id.short(), by = %actor.short(), "parties demerged");
        Ok(())
    }

    /// A party's position in the merge forest with aggregate counts
    ///
    /// The breakdown lists the party itself first, then its transitive
    /// descendants breadth-first in merge order; `total_members` is the
    /// sum over those rows. Ancestors never contribute.
    pub async fn merge_status(&self, party: &PartyId) -> CivicResult<MergeStatus> {
        self.require_party(party).await?;

        let current = self.store().active_merge_for_child(party).await?;
        let children = self.store().active_merges_to_parent(party).await?;
        let forest = MergeForest::from_edges(&self.store().active_merges().await?);

        let mut breakdown = Vec::new();
        let mut total_members = 0u64;
        for node in forest.subtree(party) {
            let node_party = self.require_party(&node).await?;
            let member_count = self.store().active_member_count(&node).await?;
            total_members += member_count;
            breakdown.push(MemberBreakdown {
                is_self: node == *party,
                party_id: node,
                issue_text: node_party.issue_text,
                member_count,
            });
        }

        Ok(MergeStatus {
            current,
            children,
            breakdown,
            total_members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{join_all, svc};
    use super::*;
    use crate::store::MemoryStore;
    use openpolitics_types::ErrorKind;

    /// A party of `n` members whose first member leads by self-vote
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
    async fn test_merge_requires_child_leader() {
        let svc = svc();
        let (child, _) = join_all(&svc, "Child", 2).await;
        let (parent, _) = join_all(&svc, "Parent", 2).await;

        // No votes cast, so the child has no leader and nobody may merge.
        let err = svc
            .merge_party(&child, &parent, &UserId::new("anyone"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_merge_aggregates_and_demerge_restores() {
        let svc = svc();
        let (child, child_leader) = led_party(&svc, "Child", 5).await;
        let (parent, _) = led_party(&svc, "Parent", 3).await;

        svc.merge_party(&child, &parent, &child_leader).await.unwrap();

        let status = svc.merge_status(&parent).await.unwrap();
        assert_eq!(status.total_members, 8);
        assert_eq!(status.breakdown.len(), 2);
        assert!(status.breakdown[0].is_self);
        assert_eq!(status.breakdown[0].member_count, 3);
        assert_eq!(status.children.len(), 1);

        // The child's own view never counts its ancestor.
        let child_status = svc.merge_status(&child).await.unwrap();
        assert_eq!(child_status.total_members, 5);
        assert!(child_status.current.is_some());

        svc.demerge_party(&child, &child_leader).await.unwrap();
        let status = svc.merge_status(&parent).await.unwrap();
        assert_eq!(status.total_members, 3);
        assert!(status.children.is_empty());
    }

    #[tokio::test]
    async fn test_one_active_merge_per_child() {
        let svc = svc();
        let (child, leader) = led_party(&svc, "Child", 2).await;
        let (p1, _) = led_party(&svc, "Parent 1", 2).await;
        let (p2, _) = led_party(&svc, "Parent 2", 2).await;

        svc.merge_party(&child, &p1, &leader).await.unwrap();
        let err = svc.merge_party(&child, &p2, &leader).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        svc.demerge_party(&child, &leader).await.unwrap();
        svc.merge_party(&child, &p2, &leader).await.unwrap();
    }

    #[tokio::test]
    async fn test_cycles_are_rejected() {
        let svc = svc();
        let (a, leader_a) = led_party(&svc, "A", 2).await;
        let (b, leader_b) = led_party(&svc, "B", 2).await;
        let (c, leader_c) = led_party(&svc, "C", 2).await;

        let err = svc.merge_party(&a, &a, &leader_a).await.unwrap_err();
        assert!(matches!(err, CivicError::SelfMerge(_)));

        svc.merge_party(&a, &b, &leader_a).await.unwrap();
        svc.merge_party(&b, &c, &leader_b).await.unwrap();

        // c -> a would close the a -> b -> c chain into a loop.
        let err = svc.merge_party(&c, &a, &leader_c).await.unwrap_err();
        assert!(matches!(err, CivicError::CycleDetected { .. }));
    }

    #[tokio::test]
    async fn test_demerge_authorization() {
        let svc = svc();
        let (child, leader) = led_party(&svc, "Child", 3).await;
        let (parent, _) = led_party(&svc, "Parent", 2).await;

        svc.merge_party(&child, &parent, &leader).await.unwrap();

        let err = svc
            .demerge_party(&child, &UserId::new("bystander"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        // The initiator may demerge even after losing leadership.
        svc.demerge_party(&child, &leader).await.unwrap();

        let err = svc.demerge_party(&child, &leader).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }
}
