//! Open Politics Domain Computations
//!
//! Pure functions over row sets read from the backing store. Nothing in
//! this crate owns persistent state or performs I/O; every computation
//! takes the rows and a reference clock and returns derived data.
//!
//! - [`ballot`]: active-vote filtering, tallying, and deterministic
//!   leader election.
//! - [`merge`]: the merge forest — cycle detection before linking and
//!   depth-capped aggregation over descendants.
//! - [`support`]: the display-time join of support edges against
//!   standing revocations.
//! - [`escalation`]: trail ordering.
//! - [`qa`]: question/answer responsiveness metrics.
//!
//! Leader state is deliberately never cached or stored: it is recomputed
//! on demand from the vote set, so it cannot go stale.

#![deny(unsafe_code)]

pub mod ballot;
pub mod escalation;
pub mod merge;
pub mod qa;
pub mod support;

pub use ballot::{leader, tally};
pub use merge::{MergeForest, MAX_MERGE_DEPTH};
pub use support::mark_revocations;
