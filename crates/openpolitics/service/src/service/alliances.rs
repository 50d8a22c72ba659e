//! Alliance actions
//!
//! Alliance creation is the one multi-row write in the system. Member
//! rows are inserted after the alliance row; if any member insert fails
//! the alliance row is deleted again (compensating rollback), so no
//! half-created alliance survives.

use chrono::Utc;
use openpolitics_types::{
    Alliance, AllianceId, AllianceLeaveOutcome, AllianceMemberRecord, AllianceRoster, CivicError,
    CivicResult, PartyId, UserId, MIN_ALLIANCE_SIZE,
};
use tracing::{info, warn};

use super::CivicService;
use crate::store::CivicStore;

impl<S: CivicStore> CivicService<S> {
    /// Create an alliance between at least two distinct parties
    pub async fn create_alliance(
        &self,
        actor: &UserId,
        name: Option<String>,
        party_ids: Vec<PartyId>,
    ) -> CivicResult<AllianceRoster> {
        let mut distinct: Vec<PartyId> = Vec::with_capacity(party_ids.len());
        for id in party_ids.iter() {
            if !distinct.contains(id) {
                distinct.push(id.clone());
            }
        }
        if distinct.len() < MIN_ALLIANCE_SIZE {
            return Err(CivicError::TooFewParties {
                required: MIN_ALLIANCE_SIZE,
                provided: distinct.len(),
            });
        }

        for id in &distinct {
            self.require_party(id).await?;
            if let Some(row) = self.store().active_alliance_membership(id).await? {
                warn!(party = %id.short(), alliance = %row.alliance_id.short(), "party already allied");
                return Err(CivicError::AlreadyAllied(id.clone()));
            }
        }

        let alliance = Alliance::new(name);
        self.store().insert_alliance(&alliance).await?;

        let mut members = Vec::with_capacity(distinct.len());
        for id in &distinct {
            let row = AllianceMemberRecord::new(alliance.id.clone(), id.clone());
            if let Err(err) = self.store().insert_alliance_member(&row).await {
                warn!(alliance = %alliance.id.short(), party = %id.short(), "member insert failed, rolling back: {}", err);
                self.store().delete_alliance(&alliance.id).await?;
                return Err(err);
            }
            members.push(row);
        }

        info!(alliance = %alliance.id.short(), by = %actor.short(), parties = members.len(), "alliance created");
        Ok(AllianceRoster { alliance, members })
    }

    /// Add a party to an existing active alliance
    pub async fn add_alliance_member(
        &self,
        alliance: &AllianceId,
        party: &PartyId,
    ) -> CivicResult<AllianceMemberRecord> {
        let record = self.require_active_alliance(alliance).await?;
        self.require_party(party).await?;

        if self.store().active_alliance_membership(party).await?.is_some() {
            return Err(CivicError::AlreadyAllied(party.clone()));
        }

        let row = AllianceMemberRecord::new(record.id.clone(), party.clone());
        self.store().insert_alliance_member(&row).await?;
        info!(alliance = %alliance.short(), party = %party.short(), "alliance member added");
        Ok(row)
    }

    /// Remove a party from an alliance
    ///
    /// Dropping below [`MIN_ALLIANCE_SIZE`] active members disbands the
    /// alliance and closes every remaining member row.
    pub async fn leave_alliance(
        &self,
        alliance: &AllianceId,
        party: &PartyId,
    ) -> CivicResult<AllianceLeaveOutcome> {
        self.require_active_alliance(alliance).await?;
        let now = Utc::now();

        let closed = self
            .store()
            .close_alliance_member(alliance, party, now)
            .await?;
        if !closed {
            return Err(CivicError::NotInAlliance {
                alliance: alliance.clone(),
                party: party.clone(),
            });
        }

        let remaining = self.store().active_alliance_members(alliance).await?;
        if remaining.len() < MIN_ALLIANCE_SIZE {
            self.store().set_alliance_disbanded(alliance, now).await?;
            let closed = self.store().close_all_alliance_members(alliance, now).await?;
            info!(alliance = %alliance.short(), closed, "alliance disbanded, below minimum size");
            return Ok(AllianceLeaveOutcome { disbanded: true });
        }

        info!(alliance = %alliance.short(), party = %party.short(), "alliance member left");
        Ok(AllianceLeaveOutcome { disbanded: false })
    }

    /// Explicitly disband an alliance, closing all member rows
    pub async fn disband_alliance(&self, alliance: &AllianceId) -> CivicResult<()> {
        self.require_active_alliance(alliance).await?;
        let now = Utc::now();
        self.store().set_alliance_disbanded(alliance, now).await?;
        self.store().close_all_alliance_members(alliance, now).await?;
        info!(alliance = %alliance.short(), "alliance disbanded");
        Ok(())
    }

    /// All active alliances with their rosters, newest first
    pub async fn list_alliances(&self) -> CivicResult<Vec<AllianceRoster>> {
        let mut result = Vec::new();
        for alliance in self.store().alliances().await? {
            if !alliance.is_active() {
                continue;
            }
            let members = self.store().active_alliance_members(&alliance.id).await?;
            result.push(AllianceRoster { alliance, members });
        }
        Ok(result)
    }

    /// The active alliance a party belongs to, if any
    pub async fn alliance_of(&self, party: &PartyId) -> CivicResult<Option<AllianceRoster>> {
        let Some(row) = self.store().active_alliance_membership(party).await? else {
            return Ok(None);
        };
        let alliance = self
            .store()
            .alliance(&row.alliance_id)
            .await?
            .ok_or_else(|| CivicError::AllianceNotFound(row.alliance_id.clone()))?;
        let members = self.store().active_alliance_members(&alliance.id).await?;
        Ok(Some(AllianceRoster { alliance, members }))
    }

    async fn require_active_alliance(&self, id: &AllianceId) -> CivicResult<Alliance> {
        let alliance = self
            .store()
            .alliance(id)
            .await?
            .ok_or_else(|| CivicError::AllianceNotFound(id.clone()))?;
        if !alliance.is_active() {
            return Err(CivicError::AllianceDisbanded(id.clone()));
        }
        Ok(alliance)
    }
}
