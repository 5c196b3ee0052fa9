//! Shared test utilities for database operations
//!
//! Provides an in-memory catalog with the full schema plus small helpers
//! for seeding releases and cover art rows.

use sqlx::SqlitePool;

use super::Database;

/// Create an in-memory test database pool with full schema
pub async fn test_pool() -> SqlitePool {
    let db = Database::new(None)
        .await
        .expect("Failed to create test database");
    db.pool().clone()
}

/// Insert a release and return its row id
pub async fn insert_release(pool: &SqlitePool, gid: &str) -> i64 {
    let result = sqlx::query("INSERT INTO release (gid) VALUES (?)")
        .bind(gid)
        .execute(pool)
        .await
        .expect("Failed to insert release");
    result.last_insert_rowid()
}

/// Insert a cover art image for a release row
pub async fn insert_cover_art(
    pool: &SqlitePool,
    release_id: i64,
    id: i64,
    is_front: bool,
    is_back: bool,
    ordering: i64,
) {
    sqlx::query(
        "INSERT INTO cover_art (id, release, is_front, is_back, ordering) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(release_id)
    .bind(is_front)
    .bind(is_back)
    .bind(ordering)
    .execute(pool)
    .await
    .expect("Failed to insert cover art");
}
