//! factories-core — pure domain logic for the factory/children service.
//!
//! A Factory names an inclusive integer range and a target number of
//! randomly generated Children. This crate holds the types, validation,
//! value generation, the port traits storage adapters implement, and the
//! `FactoryService` orchestrator that decides when children must be wiped
//! and regenerated. No sqlx, no axum — adapters live in sibling crates.

pub mod error;
pub mod generate;
pub mod memory;
pub mod ports;
pub mod proto;
pub mod service;
pub mod types;
pub mod validate;
