//! The merge forest
//!
//! An explicit adjacency view over the active merge edges, rebuilt per
//! request from the rows the store returns. Cycle detection runs before
//! every edge insertion; aggregation walks descendants only (merging is
//! asymmetric — children roll up into parents, not the reverse).

use chrono::{DateTime, Utc};
use openpolitics_types::{MergeRecord, PartyId};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;

/// Defensive cap on ancestor/descendant walks
///
/// Cycle prevention keeps the live graph a forest; the cap only
/// guarantees termination if that is ever bypassed.
pub const MAX_MERGE_DEPTH: usize = 32;

/// Adjacency view over the active merge edges
#[derive(Clone, Debug, Default)]
pub struct MergeForest {
    /// child -> parent
    parent: HashMap<PartyId, PartyId>,
    /// parent -> children, ordered by merge time
    children: HashMap<PartyId, Vec<(DateTime<Utc>, PartyId)>>,
}

impl MergeForest {
    /// Build the forest from merge rows, keeping only active edges
    pub fn from_edges(edges: &[MergeRecord]) -> Self {
        let mut forest = Self::default();
        for edge in edges.iter().filter(|e| e.is_active()) {
            forest
                .parent
                .insert(edge.child_party_id.clone(), edge.parent_party_id.clone());
            forest
                .children
                .entry(edge.parent_party_id.clone())
                .or_default()
                .push((edge.merged_at, edge.child_party_id.clone()));
        }
        for siblings in forest.children.values_mut() {
            siblings.sort_by(|a, b| a.0.cmp(&b.0));
        }
        forest
    }

    /// The active parent of a party, if merged
    pub fn parent_of(&self, party: &PartyId) -> Option<&PartyId> {
        self.parent.get(party)
    }

    /// Whether `node` appears in `candidate`'s ancestor chain
    pub fn is_ancestor(&self, node: &PartyId, candidate: &PartyId) -> bool {
        let mut current = candidate;
        for _ in 0..MAX_MERGE_DEPTH {
            match self.parent.get(current) {
                Some(parent) if parent == node => return true,
                Some(parent) => current = parent,
                None => return false,
            }
        }
        warn!(party = %candidate, "ancestor walk exceeded depth cap; treating as cyclic");
        true
    }

    /// Whether inserting `child -> parent` would close a cycle
    ///
    /// A cycle exists iff `child` is already an ancestor of `parent`
    /// (or the two are the same party).
    pub fn would_create_cycle(&self, child: &PartyId, parent: &PartyId) -> bool {
        child == parent || self.is_ancestor(child, parent)
    }

    /// The party and all transitive descendants via active edges
    ///
    /// Breadth-first, children in merge order, depth-capped. A visited
    /// set keeps the walk terminating even on a corrupted graph.
    pub fn subtree(&self, root: &PartyId) -> Vec<PartyId> {
        let mut ordered = vec![root.clone()];
        let mut visited: HashSet<PartyId> = HashSet::from([root.clone()]);
        let mut queue: VecDeque<(PartyId, usize)> = VecDeque::from([(root.clone(), 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            if depth >= MAX_MERGE_DEPTH {
                warn!(party = %root, "descendant walk hit depth cap; truncating subtree");
                continue;
            }
            for (_, child) in self.children.get(&node).into_iter().flatten() {
                if visited.insert(child.clone()) {
                    ordered.push(child.clone());
                    queue.push_back((child.clone(), depth + 1));
                }
            }
        }
        ordered
    }

    /// Sum of member counts over the party and its descendants
    ///
    /// Ancestors are never counted; the lookup supplies each node's own
    /// active member count.
    pub fn total_members(&self, root: &PartyId, member_count: impl Fn(&PartyId) -> u64) -> u64 {
        self.subtree(root).iter().map(|p| member_count(p)).sum()
    }
}
