//! Escalation trail ordering
//!
//! A trail is the flat list of a party's outgoing escalation edges by
//! creation time ascending. Multi-hop chains are rendered by the caller
//! re-querying from each target; nothing recursive happens here.

use openpolitics_types::EscalationRecord;

/// Order a party's outgoing escalation edges into a trail
pub fn order_trail(mut edges: Vec<EscalationRecord>) -> Vec<EscalationRecord> {
    edges.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.0.cmp(&b.id.0)));
    edges
}
