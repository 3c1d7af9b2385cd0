//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define typed data access contracts for items.
//! - Isolate SQLite query details from the gateway service.
//!
//! # Invariants
//! - Repository writes enforce `ItemDraft::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod item_repo;
