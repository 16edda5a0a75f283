//! Database bootstrap tests
//!
//! Verifies that a file-backed database is created, migrated and
//! reusable across reopen.

use kantin_server::db::DbService;
use kantin_server::db::repository::user;
use shared::models::Role;

#[tokio::test]
async fn test_file_backed_database_migrates_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("kantin.db");
    let db_path = db_path.to_string_lossy();

    let created_id = {
        let db = DbService::new(&db_path).await.expect("open database");
        let account = user::create(&db.pool, "ibu_sari", "hash", Role::VendorAdmin)
            .await
            .expect("insert user");
        db.pool.close().await;
        account.id
    };

    // Reopen: migrations are idempotent and data survives
    let db = DbService::new(&db_path).await.expect("reopen database");
    let found = user::find_by_id(&db.pool, created_id)
        .await
        .expect("query user")
        .expect("user still present");
    assert_eq!(found.username, "ibu_sari");
    assert_eq!(found.role, Role::VendorAdmin);
}

#[tokio::test]
async fn test_duplicate_username_is_reported_as_duplicate() {
    let db = DbService::in_memory().await.expect("in-memory db");
    user::create(&db.pool, "budi", "hash", Role::Student)
        .await
        .expect("first insert");

    let err = user::create(&db.pool, "budi", "hash", Role::Student)
        .await
        .expect_err("unique constraint must fire");
    assert!(matches!(
        err,
        kantin_server::db::repository::RepoError::Duplicate(_)
    ));
}
