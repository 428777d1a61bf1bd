//! factories-postgres — sqlx/Postgres implementation of the factory store.
//!
//! Schema lives in `migrations/`; apply it (and optionally `seed.sql`)
//! with psql before first use.

mod store;

pub use store::PgFactoryStore;
