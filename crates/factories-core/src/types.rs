//! Domain types shared by the core, the storage adapters, and the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive limit on generation bounds; keeps the range arithmetic and
/// the BIGINT columns far away from overflow.
pub const MIN_BOUND: i64 = -1_000_000;
pub const MAX_BOUND: i64 = 1_000_000;

/// Maximum number of children a factory may target.
pub const MAX_CHILDREN: i32 = 15;

/// A named configuration record defining a numeric range and a target
/// count of generated children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factory {
    pub id: i64,
    pub name: String,
    pub lower_bound: i64,
    pub upper_bound: i64,
    pub children_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single generated value owned by exactly one factory.
///
/// `factory_id` serializes as `factoryId` — the wire shape predates this
/// implementation and the viewers depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub value: i64,
    #[serde(rename = "factoryId")]
    pub factory_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A factory together with its current child set, as returned by every
/// read and mutation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryWithChildren {
    #[serde(flatten)]
    pub factory: Factory,
    pub children: Vec<Child>,
}

/// Fields for a new factory row. All values are pre-validated.
#[derive(Debug, Clone)]
pub struct NewFactory {
    pub name: String,
    pub lower_bound: i64,
    pub upper_bound: i64,
    pub children_count: i32,
}

/// Staged field updates for an existing factory. `None` leaves the
/// column untouched; `children_count` is never editable through here.
#[derive(Debug, Clone, Default)]
pub struct FactoryChanges {
    pub name: Option<String>,
    pub bounds: Option<(i64, i64)>,
}

impl FactoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bounds.is_none()
    }
}
