//! Content store boundary.
//!
//! The store persists sections as field maps and versions as immutable
//! snapshot payloads. Handles are shared as `Arc<dyn ContentStore>` and
//! injected into whatever needs them.

mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::MemoryContentStore;

use crate::error::CoreError;
use crate::section::{Fields, Section, SectionTag};
use crate::types::{DbId, Timestamp};

/// Default number of versions returned by a listing.
pub const DEFAULT_VERSION_LIMIT: i64 = 10;

/// Upper bound on versions returned by a listing.
pub const MAX_VERSION_LIMIT: i64 = 100;

/// Clamp a caller-supplied listing limit into `1..=MAX_VERSION_LIMIT`.
pub fn clamp_version_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_VERSION_LIMIT)
        .clamp(1, MAX_VERSION_LIMIT)
}

// ---------------------------------------------------------------------------
// Version records
// ---------------------------------------------------------------------------

/// A stored snapshot of the full section graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageVersion {
    pub id: DbId,
    pub name: Option<String>,
    pub snapshot: String,
    pub checksum: String,
    pub section_count: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// List view of a version, without the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: DbId,
    pub name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub section_count: i32,
    pub snapshot_bytes: i64,
}

impl From<&HomepageVersion> for VersionSummary {
    fn from(v: &HomepageVersion) -> Self {
        Self {
            id: v.id,
            name: v.name.clone(),
            is_active: v.is_active,
            created_at: v.created_at,
            section_count: v.section_count,
            snapshot_bytes: v.snapshot.len() as i64,
        }
    }
}

/// Input for inserting a version.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub name: Option<String>,
    pub snapshot: String,
    pub checksum: String,
    pub section_count: i32,
    /// Deactivate every other version and mark this one active.
    pub activate: bool,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_section(&self, tag: SectionTag) -> Result<Option<Section>, CoreError>;

    /// Merge `fields` into the section, creating it on first write.
    ///
    /// Each provided field replaces the stored value wholesale; fields not
    /// provided keep their stored value. A section holding no fields is not
    /// stored, so an empty map on a new section returns [`Section::empty`].
    async fn upsert_section(&self, tag: SectionTag, fields: Fields)
        -> Result<Section, CoreError>;

    /// Every stored section in site order.
    async fn list_sections(&self) -> Result<Vec<Section>, CoreError>;

    async fn insert_version(&self, version: NewVersion) -> Result<HomepageVersion, CoreError>;

    /// Most recent first.
    async fn list_versions(&self, limit: i64) -> Result<Vec<VersionSummary>, CoreError>;

    async fn get_version(&self, id: DbId) -> Result<Option<HomepageVersion>, CoreError>;

    /// Replace every listed section wholesale and make `version_id` the only
    /// active version, all in one atomic step. Sections not listed are left
    /// untouched; a listed section with no fields is removed.
    async fn restore_snapshot(
        &self,
        version_id: DbId,
        sections: Vec<(SectionTag, Fields)>,
    ) -> Result<(), CoreError>;

    async fn health_check(&self) -> Result<(), CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_version_limit(None), 10);
        assert_eq!(clamp_version_limit(Some(0)), 1);
        assert_eq!(clamp_version_limit(Some(500)), 100);
        assert_eq!(clamp_version_limit(Some(25)), 25);
    }
}
