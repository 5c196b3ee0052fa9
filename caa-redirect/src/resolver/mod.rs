//! Redirect resolution
//!
//! Turns a release id plus an image request into the public download URL of
//! the stored file. Each resolution issues exactly one catalog query.

pub mod route;

use thiserror::Error;
use tracing::debug;

use crate::catalog::{CatalogStore, Role};

pub use route::{ImageRequest, RouteError, Selector, Size, DEFAULT_EXTENSION};

/// Resolution failures
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No {role} cover image found for release {release}")]
    MissingRole { release: String, role: Role },

    #[error("No cover image with id {image_id} found for release {release}")]
    MissingImage { release: String, image_id: i64 },

    #[error("No cover art found for release {release}")]
    NoCoverArt { release: String },

    #[error("Invalid request: {0}")]
    Malformed(#[from] RouteError),

    #[error("catalog error: {0}")]
    Catalog(#[from] sqlx::Error),
}

impl ResolveError {
    /// Whether the catalog simply had nothing matching
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::MissingRole { .. }
                | ResolveError::MissingImage { .. }
                | ResolveError::NoCoverArt { .. }
        )
    }
}

/// A resolved redirect target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    /// Plain-text body sent alongside the Location header
    pub fn body(&self) -> String {
        format!("See: {}\n", self.location)
    }
}

/// Maps image requests to download locations
#[derive(Clone)]
pub struct Resolver {
    catalog: CatalogStore,
    download_prefix: String,
}

impl Resolver {
    /// Create a resolver publishing under `download_prefix` (no trailing slash)
    pub fn new(catalog: CatalogStore, download_prefix: impl Into<String>) -> Self {
        Self {
            catalog,
            download_prefix: download_prefix.into(),
        }
    }

    /// Parse a file segment and resolve it
    pub async fn resolve_segment(
        &self,
        release: &str,
        segment: &str,
    ) -> Result<Redirect, ResolveError> {
        let request = route::parse(segment)?;
        self.resolve(release, &request).await
    }

    /// Resolve an image request for a release
    pub async fn resolve(
        &self,
        release: &str,
        request: &ImageRequest,
    ) -> Result<Redirect, ResolveError> {
        let image = match request.selector {
            Selector::Role(role) => self
                .catalog
                .find_by_role(release, role)
                .await?
                .ok_or_else(|| ResolveError::MissingRole {
                    release: release.to_string(),
                    role,
                })?,
            Selector::Id(image_id) => self
                .catalog
                .find_by_id(release, image_id)
                .await?
                .ok_or_else(|| ResolveError::MissingImage {
                    release: release.to_string(),
                    image_id,
                })?,
        };

        let location = format!(
            "{}/mbid-{}-{}{}.{}",
            self.release_dir(release),
            release,
            image.id,
            request.size.suffix(),
            request.extension
        );
        debug!("{} {:?} -> {}", release, request.selector, location);

        Ok(Redirect { location })
    }

    /// Resolve the index document of a release
    pub async fn resolve_index(&self, release: &str) -> Result<Redirect, ResolveError> {
        if !self.catalog.has_cover_art(release).await? {
            return Err(ResolveError::NoCoverArt {
                release: release.to_string(),
            });
        }

        Ok(Redirect {
            location: format!("{}/index.json", self.release_dir(release)),
        })
    }

    fn release_dir(&self, release: &str) -> String {
        format!("{}/mbid-{}", self.download_prefix, release)
    }
}
