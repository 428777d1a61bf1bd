//! Postgres implementation of the factories-core port traits.
//!
//! A newtype wrapping PgPool. All SQL is runtime-checked (sqlx::query,
//! not sqlx::query!) to avoid a compile-time DB requirement. The two
//! multi-statement writes (create, replace_children) run inside a single
//! transaction each.

use std::collections::BTreeMap;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use factories_core::error::Result;
use factories_core::ports::FactoryStore;
use factories_core::types::{Child, Factory, FactoryChanges, FactoryWithChildren, NewFactory};

/// Postgres-backed factory store.
pub struct PgFactoryStore {
    pool: PgPool,
}

impl PgFactoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PgFactoryRow {
    id: i64,
    name: String,
    lower_bound: i64,
    upper_bound: i64,
    children_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PgFactoryRow> for Factory {
    fn from(r: PgFactoryRow) -> Self {
        Factory {
            id: r.id,
            name: r.name,
            lower_bound: r.lower_bound,
            upper_bound: r.upper_bound,
            children_count: r.children_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(FromRow)]
struct PgChildRow {
    id: i64,
    value: i64,
    factory_id: i64,
    created_at: DateTime<Utc>,
}

impl From<PgChildRow> for Child {
    fn from(r: PgChildRow) -> Self {
        Child {
            id: r.id,
            value: r.value,
            factory_id: r.factory_id,
            created_at: r.created_at,
        }
    }
}

const SELECT_FACTORY: &str = r#"
    SELECT id, name, lower_bound, upper_bound, children_count, created_at, updated_at
    FROM factories
"#;

const SELECT_CHILDREN: &str = r#"
    SELECT id, value, factory_id, created_at
    FROM children
"#;

#[async_trait]
impl FactoryStore for PgFactoryStore {
    async fn list(&self) -> Result<Vec<FactoryWithChildren>> {
        let factories: Vec<PgFactoryRow> =
            sqlx::query_as(&format!("{SELECT_FACTORY} ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;

        let children: Vec<PgChildRow> =
            sqlx::query_as(&format!("{SELECT_CHILDREN} ORDER BY factory_id, id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;

        let mut by_factory: BTreeMap<i64, Vec<Child>> = BTreeMap::new();
        for row in children {
            by_factory.entry(row.factory_id).or_default().push(row.into());
        }

        Ok(factories
            .into_iter()
            .map(|row| {
                let children = by_factory.remove(&row.id).unwrap_or_default();
                FactoryWithChildren {
                    factory: row.into(),
                    children,
                }
            })
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<FactoryWithChildren>> {
        let row: Option<PgFactoryRow> =
            sqlx::query_as(&format!("{SELECT_FACTORY} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;
        let Some(row) = row else {
            return Ok(None);
        };

        let children: Vec<PgChildRow> =
            sqlx::query_as(&format!("{SELECT_CHILDREN} WHERE factory_id = $1 ORDER BY id"))
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;

        Ok(Some(FactoryWithChildren {
            factory: row.into(),
            children: children.into_iter().map(Into::into).collect(),
        }))
    }

    async fn create(&self, factory: NewFactory, values: &[i64]) -> Result<FactoryWithChildren> {
        let mut tx = self.pool.begin().await.map_err(|e| anyhow!(e))?;

        let row: PgFactoryRow = sqlx::query_as(
            r#"
            INSERT INTO factories (name, lower_bound, upper_bound, children_count)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, lower_bound, upper_bound, children_count, created_at, updated_at
            "#,
        )
        .bind(&factory.name)
        .bind(factory.lower_bound)
        .bind(factory.upper_bound)
        .bind(factory.children_count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| anyhow!(e))?;

        let children: Vec<PgChildRow> = if values.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(
                r#"
                INSERT INTO children (value, factory_id)
                SELECT v, $2 FROM UNNEST($1::bigint[]) AS t(v)
                RETURNING id, value, factory_id, created_at
                "#,
            )
            .bind(values)
            .bind(row.id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| anyhow!(e))?
        };

        tx.commit().await.map_err(|e| anyhow!(e))?;

        Ok(FactoryWithChildren {
            factory: row.into(),
            children: children.into_iter().map(Into::into).collect(),
        })
    }

    async fn update_fields(&self, id: i64, changes: FactoryChanges) -> Result<bool> {
        let (lower, upper) = match changes.bounds {
            Some((l, u)) => (Some(l), Some(u)),
            None => (None, None),
        };
        let result = sqlx::query(
            r#"
            UPDATE factories
            SET name = COALESCE($2, name),
                lower_bound = COALESCE($3, lower_bound),
                upper_bound = COALESCE($4, upper_bound),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(lower)
        .bind(upper)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_children(&self, id: i64, values: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| anyhow!(e))?;

        sqlx::query("DELETE FROM children WHERE factory_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!(e))?;

        if !values.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO children (value, factory_id)
                SELECT v, $2 FROM UNNEST($1::bigint[]) AS t(v)
                "#,
            )
            .bind(values)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!(e))?;
        }

        tx.commit().await.map_err(|e| anyhow!(e))?;
        tracing::debug!(factory_id = id, children = values.len(), "child set replaced");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // children go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM factories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(result.rows_affected() > 0)
    }
}
