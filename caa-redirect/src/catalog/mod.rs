//! Cover art catalog
//!
//! Read-only view over releases and the images stored for them. The catalog
//! is populated elsewhere; this crate only queries it.

mod store;

use std::fmt;

pub use store::CatalogStore;

/// Logical image role within a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Front,
    Back,
}

impl Role {
    /// Path spelling of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Front => "front",
            Role::Back => "back",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored cover art image
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CoverArt {
    pub id: i64,
    pub release_gid: String,
    pub is_front: bool,
    pub is_back: bool,
    pub ordering: i64,
}
