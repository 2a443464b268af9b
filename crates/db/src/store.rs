//! [`ContentStore`] backed by PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use folio_core::error::CoreError;
use folio_core::section::{Fields, Section, SectionTag};
use folio_core::store::{ContentStore, HomepageVersion, NewVersion, VersionSummary};
use folio_core::types::DbId;

use crate::models::section_field::{assemble_sections, FieldWrite};
use crate::repositories::{SectionRepo, VersionRepo};
use crate::DbPool;

/// PostgreSQL content store. Multi-row writes run in a single transaction.
#[derive(Clone)]
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error into the domain error space.
///
/// Unique violations on `uq_` constraints become conflicts; everything else
/// is a store failure whose detail is logged by the HTTP layer.
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    CoreError::Store(err.to_string())
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn get_section(&self, tag: SectionTag) -> Result<Option<Section>, CoreError> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        let rows = SectionRepo::list_by_section(&mut conn, tag.as_str())
            .await
            .map_err(map_db_error)?;
        Ok(assemble_sections(rows)?.into_iter().next())
    }

    async fn upsert_section(
        &self,
        tag: SectionTag,
        fields: Fields,
    ) -> Result<Section, CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        for field in FieldWrite::for_section(tag, fields) {
            SectionRepo::upsert_field(&mut tx, tag.as_str(), &field)
                .await
                .map_err(map_db_error)?;
        }
        let rows = SectionRepo::list_by_section(&mut tx, tag.as_str())
            .await
            .map_err(map_db_error)?;
        tx.commit().await.map_err(map_db_error)?;

        // No rows means the section holds no fields, which is not stored.
        Ok(assemble_sections(rows)?
            .into_iter()
            .next()
            .unwrap_or_else(|| Section::empty(tag, Utc::now())))
    }

    async fn list_sections(&self) -> Result<Vec<Section>, CoreError> {
        let rows = SectionRepo::list_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        assemble_sections(rows)
    }

    async fn insert_version(&self, version: NewVersion) -> Result<HomepageVersion, CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        if version.activate {
            VersionRepo::deactivate_all(&mut tx)
                .await
                .map_err(map_db_error)?;
        }
        let row = VersionRepo::create(
            &mut tx,
            version.name.as_deref(),
            &version.snapshot,
            &version.checksum,
            version.section_count,
            version.activate,
        )
        .await
        .map_err(map_db_error)?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(row.into())
    }

    async fn list_versions(&self, limit: i64) -> Result<Vec<VersionSummary>, CoreError> {
        let rows = VersionRepo::list_recent(&self.pool, limit)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_version(&self, id: DbId) -> Result<Option<HomepageVersion>, CoreError> {
        let row = VersionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(Into::into))
    }

    async fn restore_snapshot(
        &self,
        version_id: DbId,
        sections: Vec<(SectionTag, Fields)>,
    ) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for (tag, fields) in sections {
            let writes = FieldWrite::for_section(tag, fields);
            SectionRepo::replace_section(&mut tx, tag.as_str(), &writes)
                .await
                .map_err(map_db_error)?;
        }

        VersionRepo::deactivate_all(&mut tx)
            .await
            .map_err(map_db_error)?;
        let found = VersionRepo::mark_active(&mut tx, version_id)
            .await
            .map_err(map_db_error)?;
        if !found {
            // Dropping the transaction rolls back the section writes.
            return Err(CoreError::not_found("HomepageVersion", version_id));
        }

        tx.commit().await.map_err(map_db_error)?;
        tracing::debug!(version_id, "Snapshot restored in one transaction");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
