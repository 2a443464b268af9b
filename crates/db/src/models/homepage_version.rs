//! Row types for the `homepage_versions` table.

use folio_core::store::{HomepageVersion, VersionSummary};
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A full version row, snapshot payload included.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HomepageVersionRow {
    pub id: DbId,
    pub name: Option<String>,
    pub snapshot: String,
    pub checksum: String,
    pub section_count: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<HomepageVersionRow> for HomepageVersion {
    fn from(row: HomepageVersionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            snapshot: row.snapshot,
            checksum: row.checksum,
            section_count: row.section_count,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Listing row; `snapshot_bytes` is computed in SQL.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VersionSummaryRow {
    pub id: DbId,
    pub name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub section_count: i32,
    pub snapshot_bytes: i64,
}

impl From<VersionSummaryRow> for VersionSummary {
    fn from(row: VersionSummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
            section_count: row.section_count,
            snapshot_bytes: row.snapshot_bytes,
        }
    }
}
