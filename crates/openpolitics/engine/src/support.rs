//! Support/revocation display join
//!
//! A revocation is a standing flag: any revocation by `(revoking_party,
//! target)` suppresses every matching support edge at render time,
//! regardless of timestamp ordering or which support row it pairs with.
//! Support rows themselves are never mutated.

use openpolitics_types::{PartySupport, Revocation, SupportView};
use std::collections::HashSet;

/// Join support edges against standing revocations
pub fn mark_revocations(supports: Vec<PartySupport>, revocations: &[Revocation]) -> Vec<SupportView> {
    let revoked: HashSet<(&str, &str)> = revocations
        .iter()
        .map(|r| (r.revoking_party_id.0.as_str(), r.target_id.as_str()))
        .collect();

    supports
        .into_iter()
        .map(|support| {
            let is_revoked = revoked.contains(&(
                support.from_party_id.0.as_str(),
                support.to_party_id.0.as_str(),
            ));
            SupportView { support, is_revoked }
        })
        .collect()
}
