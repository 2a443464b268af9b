//! End-to-end publish pipeline tests over the in-memory store and a temp site.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use folio_core::error::CoreError;
use folio_core::section::{Fields, Section, SectionTag};
use folio_core::store::{ContentStore, HomepageVersion, MemoryContentStore, NewVersion, VersionSummary};
use folio_core::types::DbId;
use folio_publish::{
    PublishConfig, PublishOrchestrator, PublishRequest, PublishStage, RestoreOptions, VersionManager,
};
use serde_json::{json, Value};
use tempfile::TempDir;

const INDEX: &str = "<!doctype html>\n<html>\n<body>\n\
<!-- cms:hero:start --><h1>placeholder</h1><!-- cms:hero:end -->\n\
<main class=\"static\">untouched</main>\n\
<!-- cms:services:start -->\n<!-- cms:services:end -->\n\
</body>\n</html>\n";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

fn site_with(pages: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, html) in pages {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, html).unwrap();
    }
    dir
}

fn config_for(dir: &TempDir, pages: &[&str]) -> PublishConfig {
    PublishConfig::new(dir.path(), pages.iter().map(|p| p.to_string()).collect())
}

async fn seed(store: &dyn ContentStore) {
    store
        .upsert_section(SectionTag::Hero, fields(json!({"title": "A"})))
        .await
        .unwrap();
    store
        .upsert_section(
            SectionTag::Services,
            fields(json!({"services": [{"id": 1, "title": "X"}]})),
        )
        .await
        .unwrap();
}

fn temp_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "tmp"))
        .collect()
}

/// Store that fails version inserts; everything else delegates.
struct FailingVersionStore {
    inner: MemoryContentStore,
}

#[async_trait]
impl ContentStore for FailingVersionStore {
    async fn get_section(&self, tag: SectionTag) -> Result<Option<Section>, CoreError> {
        self.inner.get_section(tag).await
    }

    async fn upsert_section(&self, tag: SectionTag, fields: Fields) -> Result<Section, CoreError> {
        self.inner.upsert_section(tag, fields).await
    }

    async fn list_sections(&self) -> Result<Vec<Section>, CoreError> {
        self.inner.list_sections().await
    }

    async fn insert_version(&self, _version: NewVersion) -> Result<HomepageVersion, CoreError> {
        Err(CoreError::Store("disk full".into()))
    }

    async fn list_versions(&self, limit: i64) -> Result<Vec<VersionSummary>, CoreError> {
        self.inner.list_versions(limit).await
    }

    async fn get_version(&self, id: DbId) -> Result<Option<HomepageVersion>, CoreError> {
        self.inner.get_version(id).await
    }

    async fn restore_snapshot(
        &self,
        version_id: DbId,
        sections: Vec<(SectionTag, Fields)>,
    ) -> Result<(), CoreError> {
        self.inner.restore_snapshot(version_id, sections).await
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_with_backup_writes_page_and_records_version() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    let publisher = PublishOrchestrator::new(store.clone(), config_for(&site, &["index.html"]));

    let result = publisher
        .publish(PublishRequest {
            create_backup: true,
            version_name: Some("v1".into()),
        })
        .await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.version.as_deref(), Some("v1"));
    assert!(result.version_id.is_some());
    assert_eq!(result.pages, vec!["index.html".to_string()]);
    assert!(result.errors.is_empty());

    let html = std::fs::read_to_string(site.path().join("index.html")).unwrap();
    assert!(html.contains(">A</h1>"));
    assert!(html.contains(">X</h3>"));
    assert!(!html.contains("placeholder"));
    assert!(html.contains("<main class=\"static\">untouched</main>"));
    assert!(html.starts_with("<!doctype html>\n<html>\n<body>\n"));

    let versions = VersionManager::new(store).list_versions(None).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].name.as_deref(), Some("v1"));
    assert!(!versions[0].is_active);
}

#[tokio::test]
async fn invalid_section_aborts_without_touching_page() {
    let site = site_with(&[("index.html", INDEX)]);
    let page = site.path().join("index.html");
    let before_mtime = std::fs::metadata(&page).unwrap().modified().unwrap();

    let store = Arc::new(MemoryContentStore::new());
    store
        .upsert_section(SectionTag::Hero, fields(json!({"title": 123})))
        .await
        .unwrap();
    let publisher = PublishOrchestrator::new(store.clone(), config_for(&site, &["index.html"]));

    tokio::time::sleep(Duration::from_millis(20)).await;
    let result = publisher
        .publish(PublishRequest {
            create_backup: true,
            version_name: Some("never".into()),
        })
        .await;

    assert!(!result.success);
    assert_eq!(result.failed_stage, Some(PublishStage::Validating));
    assert!(result.errors.iter().any(|e| e.starts_with("hero.title")));
    assert!(result.version.is_none());

    assert_eq!(std::fs::read_to_string(&page).unwrap(), INDEX);
    assert_eq!(std::fs::metadata(&page).unwrap().modified().unwrap(), before_mtime);
    assert!(VersionManager::new(store).list_versions(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshot_failure_aborts_before_writing() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(FailingVersionStore {
        inner: MemoryContentStore::new(),
    });
    seed(store.as_ref()).await;
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    let result = publisher
        .publish(PublishRequest {
            create_backup: true,
            version_name: None,
        })
        .await;

    assert!(!result.success);
    assert_eq!(result.failed_stage, Some(PublishStage::Snapshotting));
    assert_eq!(
        std::fs::read_to_string(site.path().join("index.html")).unwrap(),
        INDEX
    );
}

#[tokio::test]
async fn publish_without_backup_skips_snapshot() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(FailingVersionStore {
        inner: MemoryContentStore::new(),
    });
    seed(store.as_ref()).await;
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(result.success, "errors: {:?}", result.errors);
    assert!(result.version.is_none());
}

#[tokio::test]
async fn missing_page_fails_rendering_and_writes_nothing() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    let publisher =
        PublishOrchestrator::new(store, config_for(&site, &["index.html", "about.html"]));

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(!result.success);
    assert_eq!(result.failed_stage, Some(PublishStage::Rendering));
    assert!(result.errors[0].contains("about.html"));
    assert_eq!(
        std::fs::read_to_string(site.path().join("index.html")).unwrap(),
        INDEX
    );
}

#[tokio::test]
async fn page_set_without_anchors_fails() {
    let site = site_with(&[("index.html", "<html><body>static</body></html>")]);
    let store = Arc::new(MemoryContentStore::new());
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(!result.success);
    assert_eq!(result.failed_stage, Some(PublishStage::Rendering));
}

#[tokio::test]
async fn missing_sections_render_from_defaults() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(result.success, "errors: {:?}", result.errors);

    let html = std::fs::read_to_string(site.path().join("index.html")).unwrap();
    assert!(!html.contains("placeholder"));
    assert!(!html.contains("{{"));
    assert!(!html.contains("undefined"));
}

#[tokio::test]
async fn republishing_same_content_leaves_page_untouched() {
    let site = site_with(&[("index.html", INDEX)]);
    let page = site.path().join("index.html");
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    let first = publisher.publish(PublishRequest::default()).await;
    assert_eq!(first.pages, vec!["index.html".to_string()]);
    let html = std::fs::read_to_string(&page).unwrap();
    let mtime = std::fs::metadata(&page).unwrap().modified().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = publisher.publish(PublishRequest::default()).await;
    assert!(second.success);
    assert!(second.pages.is_empty());
    assert_eq!(std::fs::read_to_string(&page).unwrap(), html);
    assert_eq!(std::fs::metadata(&page).unwrap().modified().unwrap(), mtime);
}

#[tokio::test]
async fn publishes_into_every_configured_page() {
    let other = "<section><!-- cms:footer:start --><!-- cms:footer:end --></section>";
    let site = site_with(&[("index.html", INDEX), ("work/index.html", other)]);
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    store
        .upsert_section(
            SectionTag::Footer,
            fields(json!({"title": "Say hi", "email": "hi@studio.test"})),
        )
        .await
        .unwrap();
    let publisher = PublishOrchestrator::new(
        store,
        config_for(&site, &["index.html", "work/index.html"]),
    );

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.pages.len(), 2);

    let footer = std::fs::read_to_string(site.path().join("work/index.html")).unwrap();
    assert!(footer.contains("hi@studio.test"));
    assert!(footer.starts_with("<section><!-- cms:footer:start -->"));
    assert!(footer.ends_with("<!-- cms:footer:end --></section>"));
}

#[tokio::test]
async fn concurrent_publishes_produce_one_complete_page() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    let publisher = Arc::new(PublishOrchestrator::new(
        store.clone(),
        config_for(&site, &["index.html"]),
    ));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let publisher = Arc::clone(&publisher);
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            store
                .upsert_section(SectionTag::Hero, fields(json!({"title": format!("Title {i}")})))
                .await
                .unwrap();
            publisher.publish(PublishRequest::default()).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().success);
    }

    let html = std::fs::read_to_string(site.path().join("index.html")).unwrap();
    assert_eq!(html.matches("<!-- cms:hero:start -->").count(), 1);
    assert_eq!(html.matches("<!-- cms:hero:end -->").count(), 1);
    assert_eq!(html.matches("Title ").count(), 1);
    assert!(html.ends_with("</body>\n</html>\n"));
    assert!(temp_files(site.path()).is_empty());
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restore_then_publish_brings_back_snapshot_content() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    let publisher = PublishOrchestrator::new(store.clone(), config_for(&site, &["index.html"]));
    let versions = VersionManager::new(store.clone());

    let published = publisher
        .publish(PublishRequest {
            create_backup: true,
            version_name: Some("v1".into()),
        })
        .await;
    let v1 = published.version_id.unwrap();

    store
        .upsert_section(SectionTag::Hero, fields(json!({"title": "B"})))
        .await
        .unwrap();
    assert!(publisher.publish(PublishRequest::default()).await.success);
    let html = std::fs::read_to_string(site.path().join("index.html")).unwrap();
    assert!(html.contains(">B</h1>"));

    let outcome = versions.restore_version(v1, RestoreOptions::default()).await.unwrap();
    assert_eq!(outcome.sections_restored, 2);
    assert!(outcome.backup.is_some());

    assert!(publisher.publish(PublishRequest::default()).await.success);
    let html = std::fs::read_to_string(site.path().join("index.html")).unwrap();
    assert!(html.contains(">A</h1>"));

    let active: Vec<_> = versions
        .list_versions(None)
        .await
        .unwrap()
        .into_iter()
        .filter(|v| v.is_active)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, v1);
}

#[tokio::test]
async fn restoring_unknown_version_is_not_found() {
    let store = Arc::new(MemoryContentStore::new());
    let versions = VersionManager::new(store);
    assert_matches!(
        versions.restore_version(999, RestoreOptions::default()).await,
        Err(CoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Stored content edge cases
// ---------------------------------------------------------------------------

#[tokio::test]
async fn null_optional_fields_publish_as_empty() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    store
        .upsert_section(
            SectionTag::Hero,
            fields(json!({"title": "A", "description": null, "videoUrl": null})),
        )
        .await
        .unwrap();
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(result.success, "errors: {:?}", result.errors);
    let html = std::fs::read_to_string(site.path().join("index.html")).unwrap();
    assert!(html.contains(">A</h1>"));
    assert!(!html.contains("null"));
}

#[tokio::test]
async fn out_of_range_id_fails_validation_with_field_path() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    store
        .upsert_section(
            SectionTag::Services,
            fields(json!({"services": [{"id": 18446744073709551615_u64, "title": "X"}]})),
        )
        .await
        .unwrap();
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(!result.success);
    assert_eq!(result.failed_stage, Some(PublishStage::Validating));
    assert_eq!(
        result.errors,
        vec!["services.services.0.id: must be an integer".to_string()]
    );
    assert_eq!(std::fs::read_to_string(site.path().join("index.html")).unwrap(), INDEX);
}

#[tokio::test]
async fn equivalent_page_entries_are_published_once() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    let publisher = PublishOrchestrator::new(
        store,
        config_for(&site, &["index.html", "./index.html"]),
    );

    let result = publisher.publish(PublishRequest::default()).await;
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.pages, vec!["index.html".to_string()]);
    assert!(temp_files(site.path()).is_empty());
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_tracks_last_successful_publish() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    seed(store.as_ref()).await;
    let publisher = PublishOrchestrator::new(store.clone(), config_for(&site, &["index.html"]));

    let status = publisher.status().await.unwrap();
    assert!(!status.is_published);
    assert!(status.published_at.is_none());
    assert!(status.last_modified.is_some());
    assert!(status.has_unpublished_changes);

    let result = publisher
        .publish(PublishRequest {
            create_backup: true,
            version_name: Some("v1".into()),
        })
        .await;
    assert!(result.success, "errors: {:?}", result.errors);

    let status = publisher.status().await.unwrap();
    assert!(status.is_published);
    assert_eq!(status.published_at, Some(result.published_at));
    assert_eq!(status.version.as_deref(), Some("v1"));
    assert_eq!(status.version_id, result.version_id);
    assert!(!status.has_unpublished_changes);

    store
        .upsert_section(SectionTag::Hero, fields(json!({"title": "B"})))
        .await
        .unwrap();
    let status = publisher.status().await.unwrap();
    assert!(status.is_published);
    assert!(status.has_unpublished_changes);
}

#[tokio::test]
async fn failed_publish_does_not_update_status() {
    let site = site_with(&[("index.html", INDEX)]);
    let store = Arc::new(MemoryContentStore::new());
    store
        .upsert_section(SectionTag::Hero, fields(json!({"title": 123})))
        .await
        .unwrap();
    let publisher = PublishOrchestrator::new(store, config_for(&site, &["index.html"]));

    assert!(!publisher.publish(PublishRequest::default()).await.success);
    let status = publisher.status().await.unwrap();
    assert!(!status.is_published);
    assert!(status.has_unpublished_changes);
}

#[tokio::test]
async fn status_without_content_has_no_changes() {
    let site = site_with(&[("index.html", INDEX)]);
    let publisher = PublishOrchestrator::new(
        Arc::new(MemoryContentStore::new()),
        config_for(&site, &["index.html"]),
    );
    let status = publisher.status().await.unwrap();
    assert!(!status.is_published);
    assert!(status.last_modified.is_none());
    assert!(!status.has_unpublished_changes);
}
