//! Trust-vote actions

use openpolitics_types::{CivicError, CivicResult, PartyId, TrustVote, UserId};
use tracing::info;

use super::CivicService;
use crate::store::CivicStore;

impl<S: CivicStore> CivicService<S> {
    /// Cast (or replace) the actor's trust vote within a party
    ///
    /// A member holds at most one live vote: any previous vote from the
    /// same voter is deleted before the new one is written, whether or
    /// not it had already expired.
    pub async fn cast_trust_vote(
        &self,
        party: &PartyId,
        actor: &UserId,
        target: &UserId,
    ) -> CivicResult<TrustVote> {
        self.require_party(party).await?;
        self.require_member(party, actor).await?;

        if self.store().active_membership(party, target).await?.is_none() {
            return Err(CivicError::TargetNotMember {
                party: party.clone(),
                user: target.clone(),
            });
        }

        self.store().delete_votes_from(party, actor).await?;
        let vote = TrustVote::cast(party.clone(), actor.clone(), target.clone());
        self.store().insert_vote(&vote).await?;

        info!(party = %party.short(), from = %actor.short(), to = %target.short(), "trust vote cast");
        Ok(vote)
    }

    /// Withdraw the actor's trust vote, if one exists
    pub async fn withdraw_trust_vote(
        &self,
        party: &PartyId,
        actor: &UserId,
    ) -> CivicResult<()> {
        self.require_party(party).await?;
        self.require_member(party, actor).await?;

        let deleted = self.store().delete_votes_from(party, actor).await?;
        if deleted == 0 {
            return Err(CivicError::NoActiveVote {
                party: party.clone(),
                user: actor.clone(),
            });
        }

        info!(party = %party.short(), from = %actor.short(), "trust vote withdrawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{join_all, svc};
    use crate::CivicStore;
    use openpolitics_types::ErrorKind;

    #[tokio::test]
    async fn test_vote_replaces_previous_vote() {
        let svc = svc();
        let (party, m) = join_all(&svc, "Issue", 3).await;

        svc.cast_trust_vote(&party, &m[0], &m[1]).await.unwrap();
        svc.cast_trust_vote(&party, &m[0], &m[2]).await.unwrap();

        let votes = svc.store().votes(&party).await.unwrap();
        let from_first: Vec<_> = votes.iter().filter(|v| v.from_user_id == m[0]).collect();
        assert_eq!(from_first.len(), 1);
        assert_eq!(from_first[0].to_user_id, m[2]);
        assert_eq!(svc.leader_of(&party).await.unwrap(), Some(m[2].clone()));
    }

    #[tokio::test]
    async fn test_self_vote_counts() {
        let svc = svc();
        let (party, m) = join_all(&svc, "Issue", 2).await;

        svc.cast_trust_vote(&party, &m[1], &m[1]).await.unwrap();
        assert_eq!(svc.leader_of(&party).await.unwrap(), Some(m[1].clone()));
    }

    #[tokio::test]
    async fn test_vote_requires_member_voter_and_target() {
        let svc = svc();
        let (party, m) = join_all(&svc, "Issue", 2).await;
        let outsider = openpolitics_types::UserId::new("outsider");

        let err = svc
            .cast_trust_vote(&party, &outsider, &m[0])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = svc
            .cast_trust_vote(&party, &m[0], &outsider)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[tokio::test]
    async fn test_withdraw_without_vote() {
        let svc = svc();
        let (party, m) = join_all(&svc, "Issue", 2).await;

        let err = svc.withdraw_trust_vote(&party, &m[0]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        svc.cast_trust_vote(&party, &m[0], &m[1]).await.unwrap();
        svc.withdraw_trust_vote(&party, &m[0]).await.unwrap();
        assert_eq!(svc.leader_of(&party).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_leaving_deletes_outgoing_votes() {
        let svc = svc();
        let (party, m) = join_all(&svc, "Issue", 3).await;

        svc.cast_trust_vote(&party, &m[1], &m[2]).await.unwrap();
        svc.leave_party(&party, &m[1], None).await.unwrap();

        assert!(svc.store().votes(&party).await.unwrap().is_empty());
        assert_eq!(svc.leader_of(&party).await.unwrap(), None);
    }
}
