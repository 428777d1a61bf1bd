//! Port traits implemented by the storage and notification adapters.
//!
//! The orchestrator only ever talks to these — Postgres in production,
//! `memory::InMemoryFactoryStore` in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FactoryChanges, FactoryWithChildren, NewFactory};

#[async_trait]
pub trait FactoryStore: Send + Sync {
    /// All factories with their children, ordered by id.
    async fn list(&self) -> Result<Vec<FactoryWithChildren>>;

    async fn find(&self, id: i64) -> Result<Option<FactoryWithChildren>>;

    /// Insert the factory row and its initial children as one transaction —
    /// readers never observe the factory without its initial child set.
    async fn create(&self, factory: NewFactory, values: &[i64]) -> Result<FactoryWithChildren>;

    /// Persist staged field changes and bump `updated_at`.
    /// Returns false when no row matches `id`.
    async fn update_fields(&self, id: i64, changes: FactoryChanges) -> Result<bool>;

    /// Delete all children of `id` and bulk-insert `values`, as one
    /// transaction — a reader sees the old set or the new set, never a
    /// partially emptied one.
    async fn replace_children(&self, id: i64, values: &[i64]) -> Result<()>;

    /// Delete the factory; the store cascades removal of its children.
    /// Returns false when no row matches `id`.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Best-effort, at-most-once publish to whatever fan-out transport is
/// configured. No retry, no queue, no ordering guarantee. Callers log
/// and discard errors — a failed publish never rolls back a mutation.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn publish(&self, event: &str, payload: serde_json::Value) -> anyhow::Result<()>;
}
