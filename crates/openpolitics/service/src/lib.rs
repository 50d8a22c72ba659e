//! Open Politics Service Layer
//!
//! The request collaborator: reads raw rows from a [`store::CivicStore`],
//! invokes the pure computations in `openpolitics-engine`, and returns
//! derived view data. Each action is an independent, short-lived
//! operation with no in-process shared mutable state; cross-request
//! coordination is delegated to the backing store's guarantees.
//!
//! The service assumes single-statement atomicity only. Flows that need
//! more (alliance creation plus member inserts, vote replacement) use
//! explicit compensation rather than a wrapping transaction.

#![deny(unsafe_code)]

pub mod service;
pub mod store;

pub use service::{require_actor, CivicService, PartyFilter};
pub use store::{CivicStore, MemoryStore};
