//! Homepage version snapshots: create, list, inspect, restore.

use std::sync::Arc;

use chrono::Utc;
use folio_core::error::CoreError;
use folio_core::snapshot::Snapshot;
use folio_core::store::{clamp_version_limit, ContentStore, HomepageVersion, NewVersion, VersionSummary};
use folio_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Name given to the snapshot taken just before a restore.
pub const AUTO_BACKUP_NAME: &str = "Auto-backup before restore";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestoreOptions {
    /// Snapshot the current content before overwriting it.
    pub backup_current: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            backup_current: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOutcome {
    pub restored: VersionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<VersionSummary>,
    pub sections_restored: usize,
}

/// Version operations over an injected content store.
#[derive(Clone)]
pub struct VersionManager {
    store: Arc<dyn ContentStore>,
}

impl VersionManager {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Snapshot every stored section into a new version.
    pub async fn create_version(
        &self,
        name: Option<String>,
        activate: bool,
    ) -> Result<HomepageVersion, CoreError> {
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let sections = self
            .store
            .list_sections()
            .await
            .map_err(|e| CoreError::Snapshot(format!("failed to read sections: {e}")))?;

        let encoded = Snapshot::capture(&sections, Utc::now()).encode()?;
        let version = self
            .store
            .insert_version(NewVersion {
                name,
                snapshot: encoded.payload,
                checksum: encoded.checksum,
                section_count: sections.len() as i32,
                activate,
            })
            .await
            .map_err(|e| match e {
                CoreError::Conflict(_) => e,
                other => CoreError::Snapshot(format!("failed to store version: {other}")),
            })?;

        tracing::info!(
            version_id = version.id,
            name = ?version.name,
            sections = version.section_count,
            active = version.is_active,
            "Created homepage version"
        );
        Ok(version)
    }

    /// Most recent first; `limit` defaults to 10 and is capped at 100.
    pub async fn list_versions(&self, limit: Option<i64>) -> Result<Vec<VersionSummary>, CoreError> {
        self.store.list_versions(clamp_version_limit(limit)).await
    }

    pub async fn get_version(&self, id: DbId) -> Result<HomepageVersion, CoreError> {
        self.store
            .get_version(id)
            .await?
            .ok_or_else(|| CoreError::not_found("HomepageVersion", id))
    }

    /// Make version `id` the current content.
    ///
    /// The payload is verified and decoded before anything is written, so a
    /// corrupt snapshot never produces a backup or touches a section.
    pub async fn restore_version(
        &self,
        id: DbId,
        options: RestoreOptions,
    ) -> Result<RestoreOutcome, CoreError> {
        let version = self.get_version(id).await?;
        let snapshot = Snapshot::decode(version.id, &version.snapshot, &version.checksum)?;
        let sections = snapshot.into_sections();
        let sections_restored = sections.len();

        let backup = if options.backup_current {
            Some(self.create_version(Some(AUTO_BACKUP_NAME.into()), false).await?)
        } else {
            None
        };

        self.store
            .restore_snapshot(id, sections)
            .await
            .map_err(|e| match e {
                CoreError::NotFound { .. } => e,
                other => CoreError::Snapshot(format!("restore of version {id} rolled back: {other}")),
            })?;

        tracing::info!(
            version_id = id,
            sections = sections_restored,
            backup_id = ?backup.as_ref().map(|b| b.id),
            "Restored homepage version"
        );

        let mut restored = VersionSummary::from(&version);
        restored.is_active = true;
        Ok(RestoreOutcome {
            restored,
            backup: backup.as_ref().map(VersionSummary::from),
            sections_restored,
        })
    }
}
