//! Item domain model.
//!
//! # Responsibility
//! - Define the data structures shared by repository, service and transport.
//!
//! # Invariants
//! - Every stored item is identified by a store-assigned `ItemId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod item;
