//! Store implementations for Hoplink.
//!
//! Only the in-memory reference store lives here; production deployments
//! plug their own [`LinkStore`](hoplink_core::LinkStore) adapter in at the
//! same trait boundary.

pub mod memory;

pub use memory::InMemoryStore;
