//! In-memory test doubles for the port traits.
//!
//! `InMemoryFactoryStore` mimics the relational store closely enough for
//! the orchestrator and HTTP tests: monotonic ids, cascade delete, fresh
//! child ids on every replacement. Locks are held only across synchronous
//! sections, never across an await.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::ports::{ChangeNotifier, FactoryStore};
use crate::types::{Child, Factory, FactoryChanges, FactoryWithChildren, NewFactory};

#[derive(Default)]
struct Inner {
    factories: BTreeMap<i64, Factory>,
    children: BTreeMap<i64, Vec<Child>>,
    next_factory_id: i64,
    next_child_id: i64,
}

#[derive(Default)]
pub struct InMemoryFactoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryFactoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children whose owning factory no longer exists. Always zero when
    /// cascade delete behaves.
    pub fn orphan_children_count(&self) -> usize {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .children
            .iter()
            .filter(|(fid, _)| !inner.factories.contains_key(fid))
            .map(|(_, kids)| kids.len())
            .sum()
    }
}

impl Inner {
    fn insert_children(&mut self, factory_id: i64, values: &[i64]) {
        let now = Utc::now();
        let kids = values
            .iter()
            .map(|&value| {
                self.next_child_id += 1;
                Child {
                    id: self.next_child_id,
                    value,
                    factory_id,
                    created_at: now,
                }
            })
            .collect();
        self.children.insert(factory_id, kids);
    }

    fn with_children(&self, factory: &Factory) -> FactoryWithChildren {
        FactoryWithChildren {
            factory: factory.clone(),
            children: self.children.get(&factory.id).cloned().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl FactoryStore for InMemoryFactoryStore {
    async fn list(&self) -> Result<Vec<FactoryWithChildren>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .factories
            .values()
            .map(|f| inner.with_children(f))
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<FactoryWithChildren>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.factories.get(&id).map(|f| inner.with_children(f)))
    }

    async fn create(&self, factory: NewFactory, values: &[i64]) -> Result<FactoryWithChildren> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.next_factory_id += 1;
        let id = inner.next_factory_id;
        let now = Utc::now();
        let row = Factory {
            id,
            name: factory.name,
            lower_bound: factory.lower_bound,
            upper_bound: factory.upper_bound,
            children_count: factory.children_count,
            created_at: now,
            updated_at: now,
        };
        inner.factories.insert(id, row.clone());
        inner.insert_children(id, values);
        Ok(inner.with_children(&row))
    }

    async fn update_fields(&self, id: i64, changes: FactoryChanges) -> Result<bool> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let Some(mut row) = inner.factories.get(&id).cloned() else {
            return Ok(false);
        };
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some((lower, upper)) = changes.bounds {
            row.lower_bound = lower;
            row.upper_bound = upper;
        }
        row.updated_at = Utc::now();
        inner.factories.insert(id, row);
        Ok(true)
    }

    async fn replace_children(&self, id: i64, values: &[i64]) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.children.remove(&id);
        inner.insert_children(id, values);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let existed = inner.factories.remove(&id).is_some();
        if existed {
            inner.children.remove(&id);
        }
        Ok(existed)
    }
}

/// Notifier that records every published event for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }

    pub fn clear(&self) {
        self.events.lock().expect("notifier lock poisoned").clear();
    }
}

#[async_trait]
impl ChangeNotifier for RecordingNotifier {
    async fn publish(&self, event: &str, payload: serde_json::Value) -> anyhow::Result<()> {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push((event.to_string(), payload));
        Ok(())
    }
}

/// Notifier whose transport is always unreachable.
pub struct FailingNotifier;

#[async_trait]
impl ChangeNotifier for FailingNotifier {
    async fn publish(&self, _event: &str, _payload: serde_json::Value) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("notification transport unreachable"))
    }
}
