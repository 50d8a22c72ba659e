//! Surface actions
//!
//! [`CivicService`] is the request collaborator: every public method is
//! one user-facing action or read view. Checks run synchronously before
//! any mutation and surface as typed [`CivicError`]s; no retries happen
//! here.

mod alliances;
mod ballots;
mod engagement;
mod merges;
mod outreach;
mod parties;

pub use parties::PartyFilter;

use chrono::Utc;
use openpolitics_engine::ballot;
use openpolitics_types::{
    CivicError, CivicResult, MembershipRecord, Party, PartyId, UserId,
};

use crate::store::CivicStore;

/// Resolve the session collaborator's answer into an acting user
///
/// The account provider exposes "current authenticated user id or none";
/// everything mutating requires the former.
pub fn require_actor(session_user: Option<UserId>) -> CivicResult<UserId> {
    session_user.ok_or_else(|| CivicError::Unauthorized("sign in required".into()))
}

/// The civic-coordination service over a backing store
pub struct CivicService<S: CivicStore> {
    store: S,
}

impl<S: CivicStore> CivicService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Direct access to the store (read views, tests)
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The party's current leader, recomputed from the live vote set
    pub async fn leader_of(&self, party: &PartyId) -> CivicResult<Option<UserId>> {
        let votes = self.store.votes(party).await?;
        Ok(ballot::leader(&votes, Utc::now()))
    }

    pub(crate) async fn require_party(&self, id: &PartyId) -> CivicResult<Party> {
        self.store
            .party(id)
            .await?
            .ok_or_else(|| CivicError::PartyNotFound(id.clone()))
    }

    pub(crate) async fn require_member(
        &self,
        party: &PartyId,
        user: &UserId,
    ) -> CivicResult<MembershipRecord> {
        self.store
            .active_membership(party, user)
            .await?
            .ok_or_else(|| CivicError::NotAMember {
                party: party.clone(),
                user: user.clone(),
            })
    }

    pub(crate) async fn require_leader(
        &self,
        party: &PartyId,
        actor: &UserId,
    ) -> CivicResult<()> {
        if self.leader_of(party).await?.as_ref() == Some(actor) {
            Ok(())
        } else {
            Err(CivicError::Unauthorized(format!(
                "only the current leader of party {} may do this",
                party.short()
            )))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use openpolitics_types::ErrorKind;

    #[test]
    fn test_require_actor() {
        assert!(require_actor(Some(UserId::new("u1"))).is_ok());
        let err = require_actor(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}
