//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing operations.
//! - Keep transport layers decoupled from storage details.

pub mod item_service;
