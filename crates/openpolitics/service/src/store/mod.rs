//! The store boundary
//!
//! The backing relational store is an external collaborator offering
//! filtered insert/select/update/delete and count queries. [`CivicStore`]
//! is that contract; [`MemoryStore`] is the in-memory implementation used
//! for development and tests.

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::CivicStore;
