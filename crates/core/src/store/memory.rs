use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ContentStore, HomepageVersion, NewVersion, VersionSummary};
use crate::error::CoreError;
use crate::section::{Fields, Section, SectionTag};
use crate::types::DbId;

/// Process-local content store.
///
/// Used when no database is configured and throughout the test suites. All
/// state sits behind a single lock, so every operation (restore included) is
/// atomic with respect to the others.
#[derive(Default)]
pub struct MemoryContentStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    sections: BTreeMap<SectionTag, Section>,
    versions: Vec<HomepageVersion>,
    last_version_id: DbId,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_section(&self, tag: SectionTag) -> Result<Option<Section>, CoreError> {
        Ok(self.state.read().await.sections.get(&tag).cloned())
    }

    async fn upsert_section(
        &self,
        tag: SectionTag,
        fields: Fields,
    ) -> Result<Section, CoreError> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        if fields.is_empty() {
            return Ok(state
                .sections
                .get(&tag)
                .cloned()
                .unwrap_or_else(|| Section::empty(tag, now)));
        }
        let section = state
            .sections
            .entry(tag)
            .or_insert_with(|| Section::empty(tag, now));
        section.fields.extend(fields);
        section.updated_at = now;
        Ok(section.clone())
    }

    async fn list_sections(&self) -> Result<Vec<Section>, CoreError> {
        Ok(self.state.read().await.sections.values().cloned().collect())
    }

    async fn insert_version(&self, version: NewVersion) -> Result<HomepageVersion, CoreError> {
        let mut state = self.state.write().await;
        if version.activate {
            for existing in &mut state.versions {
                existing.is_active = false;
            }
        }
        state.last_version_id += 1;
        let record = HomepageVersion {
            id: state.last_version_id,
            name: version.name,
            snapshot: version.snapshot,
            checksum: version.checksum,
            section_count: version.section_count,
            is_active: version.activate,
            created_at: Utc::now(),
        };
        state.versions.push(record.clone());
        Ok(record)
    }

    async fn list_versions(&self, limit: i64) -> Result<Vec<VersionSummary>, CoreError> {
        let state = self.state.read().await;
        let mut versions: Vec<&HomepageVersion> = state.versions.iter().collect();
        versions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(versions
            .into_iter()
            .take(limit.max(0) as usize)
            .map(VersionSummary::from)
            .collect())
    }

    async fn get_version(&self, id: DbId) -> Result<Option<HomepageVersion>, CoreError> {
        let state = self.state.read().await;
        Ok(state.versions.iter().find(|v| v.id == id).cloned())
    }

    async fn restore_snapshot(
        &self,
        version_id: DbId,
        sections: Vec<(SectionTag, Fields)>,
    ) -> Result<(), CoreError> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        if !state.versions.iter().any(|v| v.id == version_id) {
            return Err(CoreError::not_found("HomepageVersion", version_id));
        }

        for (tag, fields) in sections {
            if fields.is_empty() {
                state.sections.remove(&tag);
                continue;
            }
            let created_at = state
                .sections
                .get(&tag)
                .map_or(now, |existing| existing.created_at);
            state.sections.insert(
                tag,
                Section {
                    section: tag,
                    fields,
                    created_at,
                    updated_at: now,
                },
            );
        }
        for version in &mut state.versions {
            version.is_active = version.id == version_id;
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
