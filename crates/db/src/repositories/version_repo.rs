//! Repository for the `homepage_versions` table.

use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::homepage_version::{HomepageVersionRow, VersionSummaryRow};

/// Column list for homepage_versions queries.
const COLUMNS: &str = "id, name, snapshot, checksum, section_count, is_active, created_at";

/// Summary columns; the payload itself is never selected for listings.
const SUMMARY_COLUMNS: &str = "id, name, is_active, created_at, section_count, \
    OCTET_LENGTH(snapshot)::BIGINT AS snapshot_bytes";

/// Persistence for version snapshots.
pub struct VersionRepo;

impl VersionRepo {
    /// Insert a version row, returning it.
    pub async fn create(
        conn: &mut PgConnection,
        name: Option<&str>,
        snapshot: &str,
        checksum: &str,
        section_count: i32,
        is_active: bool,
    ) -> Result<HomepageVersionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO homepage_versions
                (name, snapshot, checksum, section_count, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HomepageVersionRow>(&query)
            .bind(name)
            .bind(snapshot)
            .bind(checksum)
            .bind(section_count)
            .bind(is_active)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<HomepageVersionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM homepage_versions WHERE id = $1");
        sqlx::query_as::<_, HomepageVersionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent versions first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<VersionSummaryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM homepage_versions
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, VersionSummaryRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Clear the active flag on every version.
    ///
    /// Must run before a version is activated, otherwise the partial unique
    /// index on `is_active` rejects the second active row.
    pub async fn deactivate_all(conn: &mut PgConnection) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE homepage_versions SET is_active = false WHERE is_active = true")
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }

    /// Mark a version active. Returns `false` when no such version exists.
    pub async fn mark_active(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE homepage_versions SET is_active = true WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
