//! Open Politics Domain Types
//!
//! This crate defines the domain types for the civic-coordination core:
//! single-issue parties scoped to postal areas, time-limited trust votes
//! that determine a party's leader, alliances between parties, directed
//! support and revocation ledgers, escalation trails, and the merge
//! forest that rolls child parties up into parents.
//!
//! # Key Concepts
//!
//! - **Party**: a single-issue group scoped to a set of 6-digit pincodes.
//! - **Trust vote**: a 90-day endorsement from one member to another;
//!   the aggregate determines the leader.
//! - **Level**: discrete size tier (1–4) derived from active member count.
//! - **Merge**: asymmetric subordination of a child party's membership
//!   count into a parent's aggregate.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime dependencies. All types
//! implement `Clone`, `Debug`, `Serialize`, `Deserialize`. IDs use the
//! newtype pattern and implement `Display`, `generate()`, and `new()`.
//! Rows are never physically deleted; lifecycle ends are modelled as
//! closing timestamps (`left_at`, `demerged_at`, `disbanded_at`) or lazy
//! expiry (`expires_at`), matching the backing store's row model.

#![deny(unsafe_code)]

mod alliance;
mod engagement;
mod errors;
mod escalation;
mod ids;
mod membership;
mod merge;
mod party;
mod support;
mod vote;

pub use alliance::*;
pub use engagement::*;
pub use errors::*;
pub use escalation::*;
pub use ids::*;
pub use membership::*;
pub use merge::*;
pub use party::*;
pub use support::*;
pub use vote::*;
