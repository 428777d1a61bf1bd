//! Integration tests for PgFactoryStore.
//!
//! Requires a running PostgreSQL database with migrations applied.
//! Run with: DATABASE_URL="postgresql:///factories" cargo test -p factories-postgres --test pg_store -- --ignored --nocapture

use factories_core::ports::FactoryStore;
use factories_core::types::{FactoryChanges, NewFactory};
use factories_postgres::PgFactoryStore;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

async fn test_pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to test database")
}

fn new_factory(name: &str, lower: i64, upper: i64, count: i32) -> NewFactory {
    NewFactory {
        name: name.into(),
        lower_bound: lower,
        upper_bound: upper,
        children_count: count,
    }
}

#[tokio::test]
#[ignore]
async fn create_inserts_factory_and_children_atomically() {
    let store = PgFactoryStore::new(test_pool().await);

    let created = store
        .create(new_factory("pg-create-test", 1, 9, 4), &[1, 3, 5, 9])
        .await
        .expect("create failed");

    assert_eq!(created.factory.name, "pg-create-test");
    assert_eq!(created.children.len(), 4);
    assert!(created
        .children
        .iter()
        .all(|c| c.factory_id == created.factory.id));

    let found = store
        .find(created.factory.id)
        .await
        .expect("find failed")
        .expect("factory missing after create");
    assert_eq!(found.children.len(), 4);

    store.delete(created.factory.id).await.expect("cleanup");
}

#[tokio::test]
#[ignore]
async fn update_fields_persists_changes_and_bumps_updated_at() {
    let store = PgFactoryStore::new(test_pool().await);
    let created = store
        .create(new_factory("pg-update-test", 0, 10, 0), &[])
        .await
        .expect("create failed");

    let updated = store
        .update_fields(
            created.factory.id,
            FactoryChanges {
                name: Some("pg-update-test-renamed".into()),
                bounds: Some((100, 200)),
            },
        )
        .await
        .expect("update failed");
    assert!(updated);

    let found = store
        .find(created.factory.id)
        .await
        .expect("find failed")
        .expect("factory missing");
    assert_eq!(found.factory.name, "pg-update-test-renamed");
    assert_eq!(found.factory.lower_bound, 100);
    assert_eq!(found.factory.upper_bound, 200);
    assert!(found.factory.updated_at > created.factory.updated_at);

    store.delete(created.factory.id).await.expect("cleanup");
}

#[tokio::test]
#[ignore]
async fn update_fields_on_missing_id_reports_false() {
    let store = PgFactoryStore::new(test_pool().await);
    let updated = store
        .update_fields(
            i64::MAX,
            FactoryChanges {
                name: Some("ghost".into()),
                bounds: None,
            },
        )
        .await
        .expect("update failed");
    assert!(!updated);
}

#[tokio::test]
#[ignore]
async fn replace_children_swaps_the_full_set() {
    let store = PgFactoryStore::new(test_pool().await);
    let created = store
        .create(new_factory("pg-replace-test", 0, 10, 3), &[1, 2, 3])
        .await
        .expect("create failed");
    let old_ids: Vec<i64> = created.children.iter().map(|c| c.id).collect();

    store
        .replace_children(created.factory.id, &[7, 8])
        .await
        .expect("replace failed");

    let found = store
        .find(created.factory.id)
        .await
        .expect("find failed")
        .expect("factory missing");
    assert_eq!(found.children.len(), 2);
    assert!(found.children.iter().all(|c| !old_ids.contains(&c.id)));

    // Replacing with an empty set clears the children.
    store
        .replace_children(created.factory.id, &[])
        .await
        .expect("replace failed");
    let found = store
        .find(created.factory.id)
        .await
        .expect("find failed")
        .expect("factory missing");
    assert!(found.children.is_empty());

    store.delete(created.factory.id).await.expect("cleanup");
}

#[tokio::test]
#[ignore]
async fn delete_cascades_to_children() {
    let store = PgFactoryStore::new(test_pool().await);
    let pool = test_pool().await;
    let created = store
        .create(new_factory("pg-delete-test", 0, 10, 2), &[4, 6])
        .await
        .expect("create failed");

    let deleted = store.delete(created.factory.id).await.expect("delete failed");
    assert!(deleted);

    let orphans: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM children WHERE factory_id = $1")
            .bind(created.factory.id)
            .fetch_one(&pool)
            .await
            .expect("count failed");
    assert_eq!(orphans, 0);

    assert!(!store.delete(created.factory.id).await.expect("delete failed"));
}
