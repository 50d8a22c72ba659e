//! Trust-ballot aggregation
//!
//! The leader of a party is derived on demand from its non-expired trust
//! votes. Expired votes are filtered here, not deleted; a vote past its
//! `expires_at` never contributes even if the row still exists.

use chrono::{DateTime, Utc};
use openpolitics_types::{TrustVote, UserId};
use std::collections::HashMap;

/// Tally active votes per candidate
pub fn tally(votes: &[TrustVote], now: DateTime<Utc>) -> HashMap<UserId, u32> {
    let mut counts: HashMap<UserId, u32> = HashMap::new();
    for vote in votes.iter().filter(|v| v.is_active(now)) {
        *counts.entry(vote.to_user_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Compute the current leader from a party's vote set
///
/// The candidate with the strictly highest tally of active votes wins.
/// Ties are broken deterministically: the candidate whose oldest active
/// vote was cast first wins (earliest support), and any remaining tie
/// falls back to lexical user-id order. Returns `None` when no active
/// votes exist.
pub fn leader(votes: &[TrustVote], now: DateTime<Utc>) -> Option<UserId> {
    struct Standing {
        count: u32,
        earliest: DateTime<Utc>,
    }

    let mut standings: HashMap<UserId, Standing> = HashMap::new();
    for vote in votes.iter().filter(|v| v.is_active(now)) {
        standings
            .entry(vote.to_user_id.clone())
            .and_modify(|s| {
                s.count += 1;
                if vote.created_at < s.earliest {
                    s.earliest = vote.created_at;
                }
            })
            .or_insert(Standing {
                count: 1,
                earliest: vote.created_at,
            });
    }

    standings
        .into_iter()
        .max_by(|(id_a, a), (id_b, b)| {
            a.count
                .cmp(&b.count)
                .then_with(|| b.earliest.cmp(&a.earliest))
                .then_with(|| id_b.cmp(id_a))
        })
        .map(|(id, _)| id)
}
