//! FactoryService — the regeneration orchestrator.
//!
//! Takes port traits via `Arc<dyn PortTrait>` so the same logic works
//! against Postgres or test doubles. The rules:
//!
//! - validate everything before the first write;
//! - a bounds change always wipes and regenerates the full child set
//!   (an out-of-range value cannot be patched, only replaced);
//! - a name-only change never touches children;
//! - `children_count` is fixed at creation and never edited here;
//! - every successful mutation publishes a `factories-updated` event,
//!   best-effort.
//!
//! No cross-request ordering is guaranteed: two concurrent mutations of
//! the same factory id may interleave at the store. Each request's
//! child replacement is atomic (see `FactoryStore::replace_children`),
//! so readers still only ever observe complete child sets.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{FactoryError, Result};
use crate::generate::ValueSource;
use crate::ports::{ChangeNotifier, FactoryStore};
use crate::proto::{CreateFactoryRequest, RegenerateRequest, UpdateFactoryRequest};
use crate::types::{FactoryChanges, FactoryWithChildren, NewFactory};
use crate::validate::{validate_bounds, validate_children_count, validate_name};

/// Event name subscribers listen for. The payload is advisory — viewers
/// are expected to refetch, not to trust it as authoritative.
pub const FACTORIES_UPDATED: &str = "factories-updated";

#[async_trait]
pub trait FactoryService: Send + Sync {
    async fn list(&self) -> Result<Vec<FactoryWithChildren>>;

    async fn get(&self, id: i64) -> Result<FactoryWithChildren>;

    /// Create a factory and synchronously generate its initial children.
    async fn create(&self, req: CreateFactoryRequest) -> Result<FactoryWithChildren>;

    /// Patch name and/or bounds. A bounds change regenerates all children
    /// under the new bounds; a request that stages nothing is a no-op and
    /// publishes no notification.
    async fn update(&self, id: i64, req: UpdateFactoryRequest) -> Result<FactoryWithChildren>;

    /// Discard and redraw the child set. Supplied bounds are validated
    /// against the current record and persisted onto it.
    async fn regenerate(&self, id: i64, req: RegenerateRequest) -> Result<FactoryWithChildren>;

    /// Delete the factory and (via store cascade) all its children.
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct FactoryServiceImpl {
    store: Arc<dyn FactoryStore>,
    notifier: Arc<dyn ChangeNotifier>,
    values: Arc<dyn ValueSource>,
}

impl FactoryServiceImpl {
    pub fn new(
        store: Arc<dyn FactoryStore>,
        notifier: Arc<dyn ChangeNotifier>,
        values: Arc<dyn ValueSource>,
    ) -> Self {
        Self {
            store,
            notifier,
            values,
        }
    }

    async fn fetch(&self, id: i64) -> Result<FactoryWithChildren> {
        self.store
            .find(id)
            .await?
            .ok_or(FactoryError::NotFound(id))
    }

    /// Publish `factories-updated`. Failure is logged and swallowed — the
    /// mutation already committed and must not be reported as failed.
    async fn notify_updated(&self, payload: serde_json::Value) {
        if let Err(e) = self.notifier.publish(FACTORIES_UPDATED, payload).await {
            tracing::warn!("change notification failed (ignored): {e:#}");
        }
    }

    async fn notify_factory(&self, factory: &FactoryWithChildren) {
        match serde_json::to_value(factory) {
            Ok(payload) => self.notify_updated(payload).await,
            Err(e) => tracing::warn!("could not serialize notification payload: {e}"),
        }
    }
}

#[async_trait]
impl FactoryService for FactoryServiceImpl {
    async fn list(&self) -> Result<Vec<FactoryWithChildren>> {
        self.store.list().await
    }

    async fn get(&self, id: i64) -> Result<FactoryWithChildren> {
        self.fetch(id).await
    }

    async fn create(&self, req: CreateFactoryRequest) -> Result<FactoryWithChildren> {
        let name = validate_name(&req.name)?;
        let (lower, upper) = validate_bounds(req.lower_bound, req.upper_bound)?;
        let children_count = validate_children_count(req.children_count)?;

        let values = self.values.draw(children_count, lower, upper);
        let created = self
            .store
            .create(
                NewFactory {
                    name,
                    lower_bound: lower,
                    upper_bound: upper,
                    children_count,
                },
                &values,
            )
            .await?;

        tracing::info!(
            factory_id = created.factory.id,
            children = created.children.len(),
            "factory created"
        );
        self.notify_factory(&created).await;
        Ok(created)
    }

    async fn update(&self, id: i64, req: UpdateFactoryRequest) -> Result<FactoryWithChildren> {
        let current = self.fetch(id).await?;
        let mut changes = FactoryChanges::default();

        if let Some(raw) = req.name.as_deref() {
            let name = validate_name(raw)?;
            if name != current.factory.name {
                changes.name = Some(name);
            }
        }

        let bounds_changed = req
            .lower_bound
            .is_some_and(|l| l != current.factory.lower_bound)
            || req
                .upper_bound
                .is_some_and(|u| u != current.factory.upper_bound);
        if bounds_changed {
            // Merge the unspecified side from the current record before
            // validating, so a one-sided patch is checked as a pair.
            let lower = req.lower_bound.unwrap_or(current.factory.lower_bound);
            let upper = req.upper_bound.unwrap_or(current.factory.upper_bound);
            changes.bounds = Some(validate_bounds(lower, upper)?);
        }

        if changes.is_empty() {
            // Nothing staged: return current state, publish nothing.
            return Ok(current);
        }

        let regenerate = changes.bounds;
        if !self.store.update_fields(id, changes).await? {
            return Err(FactoryError::NotFound(id));
        }

        if let Some((lower, upper)) = regenerate {
            let values = self
                .values
                .draw(current.factory.children_count, lower, upper);
            self.store.replace_children(id, &values).await?;
            tracing::info!(
                factory_id = id,
                children = values.len(),
                "bounds changed, children regenerated"
            );
        }

        let fresh = self.fetch(id).await?;
        self.notify_factory(&fresh).await;
        Ok(fresh)
    }

    async fn regenerate(&self, id: i64, req: RegenerateRequest) -> Result<FactoryWithChildren> {
        let current = self.fetch(id).await?;

        let lower = req.lower_bound.unwrap_or(current.factory.lower_bound);
        let upper = req.upper_bound.unwrap_or(current.factory.upper_bound);
        let (lower, upper) = validate_bounds(lower, upper)?;

        // Supplied bounds persist onto the record, keeping this endpoint
        // consistent with PATCH.
        if (lower, upper) != (current.factory.lower_bound, current.factory.upper_bound) {
            let changes = FactoryChanges {
                name: None,
                bounds: Some((lower, upper)),
            };
            if !self.store.update_fields(id, changes).await? {
                return Err(FactoryError::NotFound(id));
            }
        }

        let values = self
            .values
            .draw(current.factory.children_count, lower, upper);
        self.store.replace_children(id, &values).await?;
        tracing::info!(factory_id = id, children = values.len(), "children regenerated");

        let fresh = self.fetch(id).await?;
        self.notify_factory(&fresh).await;
        Ok(fresh)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(FactoryError::NotFound(id));
        }
        tracing::info!(factory_id = id, "factory deleted");
        self.notify_updated(serde_json::json!({ "id": id })).await;
        Ok(())
    }
}
