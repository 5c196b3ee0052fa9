//! Catalog queries
//!
//! Every lookup is a single statement against the pool; the connection is
//! held only while that statement runs.

use sqlx::SqlitePool;
use tracing::debug;

use super::{CoverArt, Role};

const FIND_FRONT: &str = r#"
    SELECT cover_art.id, release.gid AS release_gid,
           cover_art.is_front, cover_art.is_back, cover_art.ordering
    FROM cover_art JOIN release ON release.id = cover_art.release
    WHERE release.gid = ? AND cover_art.is_front = 1
    ORDER BY cover_art.ordering, cover_art.id
    LIMIT 1
"#;

const FIND_BACK: &str = r#"
    SELECT cover_art.id, release.gid AS release_gid,
           cover_art.is_front, cover_art.is_back, cover_art.ordering
    FROM cover_art JOIN release ON release.id = cover_art.release
    WHERE release.gid = ? AND cover_art.is_back = 1
    ORDER BY cover_art.ordering, cover_art.id
    LIMIT 1
"#;

const FIND_BY_ID: &str = r#"
    SELECT cover_art.id, release.gid AS release_gid,
           cover_art.is_front, cover_art.is_back, cover_art.ordering
    FROM cover_art JOIN release ON release.id = cover_art.release
    WHERE release.gid = ? AND cover_art.id = ?
"#;

const HAS_COVER_ART: &str = r#"
    SELECT EXISTS (
        SELECT 1 FROM cover_art JOIN release ON release.id = cover_art.release
        WHERE release.gid = ?
    )
"#;

/// Read-only access to releases and their cover art
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Create a new catalog store with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the image carrying a role flag for a release
    ///
    /// Should several images carry the flag, the lowest ordering wins.
    pub async fn find_by_role(
        &self,
        release_gid: &str,
        role: Role,
    ) -> Result<Option<CoverArt>, sqlx::Error> {
        let sql = match role {
            Role::Front => FIND_FRONT,
            Role::Back => FIND_BACK,
        };

        let image = sqlx::query_as::<_, CoverArt>(sql)
            .bind(release_gid)
            .fetch_optional(&self.pool)
            .await?;

        debug!(
            "{} image for {}: {:?}",
            role,
            release_gid,
            image.as_ref().map(|i| i.id)
        );
        Ok(image)
    }

    /// Find an image by id, scoped to the release it belongs to
    pub async fn find_by_id(
        &self,
        release_gid: &str,
        image_id: i64,
    ) -> Result<Option<CoverArt>, sqlx::Error> {
        sqlx::query_as::<_, CoverArt>(FIND_BY_ID)
            .bind(release_gid)
            .bind(image_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Check whether a release has any cover art at all
    pub async fn has_cover_art(&self, release_gid: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (i64,) = sqlx::query_as(HAS_COVER_ART)
            .bind(release_gid)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists != 0)
    }
}
