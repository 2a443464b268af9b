//! Publish orchestrator.
//!
//! A publish moves through `Validating -> Rendering -> Snapshotting (optional)
//! -> Writing`. Failure at any stage returns a [`PublishResult`] with
//! `success: false` and leaves every published page exactly as it was.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use folio_core::error::CoreError;
use folio_core::render::Renderer;
use folio_core::section::{Section, SectionContent, SectionTag};
use folio_core::store::{ContentStore, HomepageVersion};
use folio_core::types::Timestamp;
use folio_core::validation::validate;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::anchors::splice_sections;
use crate::atomic::{self, PendingWrite, StageCancel};
use crate::config::PublishConfig;
use crate::lock::PageLocks;
use crate::result::{PublishRequest, PublishResult, PublishStage, PublishStatus};
use crate::versions::VersionManager;

// ---------------------------------------------------------------------------
// Internal types
// ---------------------------------------------------------------------------

/// A page read from disk with its managed regions already replaced.
struct RenderedPage {
    name: String,
    path: PathBuf,
    original: String,
    html: String,
}

impl RenderedPage {
    fn changed(&self) -> bool {
        self.html != self.original
    }
}

/// The last successful publish and when its content was read.
struct LastPublish {
    result: PublishResult,
    content_as_of: Timestamp,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct PublishOrchestrator {
    store: Arc<dyn ContentStore>,
    versions: VersionManager,
    config: PublishConfig,
    locks: PageLocks,
    renderer: Renderer,
    last: RwLock<Option<LastPublish>>,
}

impl PublishOrchestrator {
    pub fn new(store: Arc<dyn ContentStore>, config: PublishConfig) -> Self {
        Self {
            versions: VersionManager::new(Arc::clone(&store)),
            renderer: Renderer::new(config.escape),
            locks: PageLocks::new(),
            last: RwLock::new(None),
            store,
            config,
        }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Publish current content to every configured page.
    ///
    /// Publishes touching the same page are serialized; the page locks are
    /// held from the first read until the last rename.
    pub async fn publish(&self, request: PublishRequest) -> PublishResult {
        let pages = self.config.page_paths();
        let paths: Vec<PathBuf> = pages.iter().map(|(_, path)| path.clone()).collect();
        let _guards = self.locks.acquire(&paths).await;

        tracing::info!(
            pages = pages.len(),
            create_backup = request.create_backup,
            "Publish started"
        );

        let content_as_of = Utc::now();
        let result = self.run(request, &pages, atomic::stage_all).await;
        if result.success {
            tracing::info!(
                written = result.pages.len(),
                version_id = ?result.version_id,
                "Publish completed"
            );
            *self.last.write().await = Some(LastPublish {
                result: result.clone(),
                content_as_of,
            });
        } else {
            tracing::warn!(
                stage = ?result.failed_stage,
                errors = ?result.errors,
                "Publish failed"
            );
        }
        result
    }

    /// Last successful publish compared against the stored content.
    pub async fn status(&self) -> Result<PublishStatus, CoreError> {
        let last_modified = self
            .store
            .list_sections()
            .await?
            .into_iter()
            .map(|s| s.updated_at)
            .max();

        let last = self.last.read().await;
        let status = match last.as_ref() {
            Some(last) => PublishStatus {
                is_published: true,
                published_at: Some(last.result.published_at),
                version: last.result.version.clone(),
                version_id: last.result.version_id,
                last_modified,
                has_unpublished_changes: last_modified.is_some_and(|m| m > last.content_as_of),
            },
            None => PublishStatus {
                is_published: false,
                published_at: None,
                version: None,
                version_id: None,
                last_modified,
                has_unpublished_changes: last_modified.is_some(),
            },
        };
        Ok(status)
    }

    /// Run every stage; `stage` writes the temp files of the Writing stage.
    async fn run<S, F>(
        &self,
        request: PublishRequest,
        pages: &[(String, PathBuf)],
        stage: S,
    ) -> PublishResult
    where
        S: FnOnce(Arc<Vec<PendingWrite>>, StageCancel) -> F,
        F: Future<Output = Result<(), CoreError>>,
    {
        tracing::debug!(stage = %PublishStage::Validating, "Publish stage");
        let sections = match self.store.list_sections().await {
            Ok(sections) => sections,
            Err(e) => return PublishResult::failed(PublishStage::Validating, vec![e.to_string()]),
        };
        let errors = validation_errors(&sections);
        if !errors.is_empty() {
            return PublishResult::failed(PublishStage::Validating, errors);
        }

        tracing::debug!(stage = %PublishStage::Rendering, "Publish stage");
        let rendered = match self.render_pages(&sections, pages).await {
            Ok(rendered) => rendered,
            Err(e) => return PublishResult::failed(PublishStage::Rendering, error_lines(e)),
        };

        let backup = if request.create_backup {
            tracing::debug!(stage = %PublishStage::Snapshotting, "Publish stage");
            match self.versions.create_version(request.version_name, false).await {
                Ok(version) => Some(version),
                Err(e) => {
                    return PublishResult::failed(PublishStage::Snapshotting, vec![e.to_string()])
                }
            }
        } else {
            None
        };

        tracing::debug!(stage = %PublishStage::Writing, "Publish stage");
        match self.write_pages(rendered, stage).await {
            Ok(written) => PublishResult {
                success: true,
                published_at: Utc::now(),
                version: backup.as_ref().map(version_label),
                version_id: backup.as_ref().map(|v| v.id),
                pages: written,
                errors: Vec::new(),
                failed_stage: None,
            },
            Err(e) => {
                // The backup was stored before the write failed; report it.
                let mut result = PublishResult::failed(PublishStage::Writing, vec![e.to_string()]);
                result.version = backup.as_ref().map(version_label);
                result.version_id = backup.as_ref().map(|v| v.id);
                result
            }
        }
    }

    async fn render_pages(
        &self,
        sections: &[Section],
        pages: &[(String, PathBuf)],
    ) -> Result<Vec<RenderedPage>, CoreError> {
        let stored: HashMap<SectionTag, &Section> =
            sections.iter().map(|s| (s.section, s)).collect();

        let mut fragments = BTreeMap::new();
        for tag in SectionTag::ALL {
            let content = match stored.get(&tag) {
                Some(section) => section.content()?,
                None => SectionContent::default_for(tag),
            };
            fragments.insert(tag, self.renderer.render(&content));
        }

        let mut rendered = Vec::with_capacity(pages.len());
        let mut anchored = 0;
        for (name, path) in pages {
            let original = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CoreError::Write(format!("failed to read page {name}: {e}")))?;
            let spliced = splice_sections(name, &original, &fragments)?;
            anchored += spliced.sections.len();
            tracing::debug!(page = %name, sections = spliced.sections.len(), "Spliced page");
            rendered.push(RenderedPage {
                name: name.clone(),
                path: path.clone(),
                original,
                html: spliced.html,
            });
        }

        if anchored == 0 {
            return Err(CoreError::Validation(
                "no configured page contains a cms section anchor".into(),
            ));
        }
        Ok(rendered)
    }

    /// Stage and commit every changed page; returns the names written.
    ///
    /// Only staging is bounded by the write timeout. Commit is a rename per
    /// page and a failed rename rolls back the pages already replaced.
    async fn write_pages<S, F>(
        &self,
        rendered: Vec<RenderedPage>,
        stage: S,
    ) -> Result<Vec<String>, CoreError>
    where
        S: FnOnce(Arc<Vec<PendingWrite>>, StageCancel) -> F,
        F: Future<Output = Result<(), CoreError>>,
    {
        let (changed, unchanged): (Vec<_>, Vec<_>) =
            rendered.into_iter().partition(RenderedPage::changed);
        for page in &unchanged {
            tracing::debug!(page = %page.name, "Page unchanged, skipping write");
        }
        if changed.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = changed.iter().map(|p| p.name.clone()).collect();
        let writes = Arc::new(
            changed
                .into_iter()
                .map(|p| PendingWrite::new(p.path, p.html.into_bytes(), p.original.into_bytes()))
                .collect::<Vec<_>>(),
        );

        let cancel = StageCancel::default();
        let timeout = self.config.write_timeout;
        match tokio::time::timeout(timeout, stage(Arc::clone(&writes), cancel.clone())).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                cancel.cancel();
                atomic::discard_all(writes).await;
                return Err(CoreError::Write(format!(
                    "writing pages timed out after {}s",
                    timeout.as_secs_f64()
                )));
            }
        }

        atomic::commit_all(writes).await?;
        Ok(names)
    }
}

/// One `"{tag}.{field}: {message}"` line per violated rule, in site order.
fn validation_errors(sections: &[Section]) -> Vec<String> {
    let mut sorted: Vec<&Section> = sections.iter().collect();
    sorted.sort_by_key(|s| s.section);

    let mut errors = Vec::new();
    for section in sorted {
        let result = validate(section.section, &Value::Object(section.fields.clone()));
        errors.extend(
            result
                .errors()
                .iter()
                .map(|e| format!("{}.{}: {}", section.section, e.field, e.message)),
        );
    }
    errors
}

/// Human-readable lines for a failed stage. Field-level content errors get
/// one `"{tag}.{field}: {message}"` line each.
fn error_lines(error: CoreError) -> Vec<String> {
    match error {
        CoreError::InvalidContent { section, errors } => errors
            .iter()
            .map(|e| format!("{section}.{}: {}", e.field, e.message))
            .collect(),
        other => vec![other.to_string()],
    }
}

fn version_label(version: &HomepageVersion) -> String {
    version
        .name
        .clone()
        .unwrap_or_else(|| version.id.to_string())
}
