//! Publish request and outcome types.

use std::fmt;

use chrono::Utc;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Stage a publish was in when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PublishStage {
    Validating,
    Rendering,
    Snapshotting,
    Writing,
}

impl PublishStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Rendering => "rendering",
            Self::Snapshotting => "snapshotting",
            Self::Writing => "writing",
        }
    }
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /publish`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishRequest {
    /// Snapshot the current content before touching any page.
    pub create_backup: bool,
    /// Name for that snapshot.
    pub version_name: Option<String>,
}

/// Outcome of a publish. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub success: bool,
    pub published_at: Timestamp,
    /// Backup name, or its id when unnamed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<DbId>,
    /// Pages written (unchanged pages are not listed).
    pub pages: Vec<String>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<PublishStage>,
}

impl PublishResult {
    pub fn failed(stage: PublishStage, errors: Vec<String>) -> Self {
        Self {
            success: false,
            published_at: Utc::now(),
            version: None,
            version_id: None,
            pages: Vec::new(),
            errors,
            failed_stage: Some(stage),
        }
    }
}

/// Whether the pages reflect the stored content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishStatus {
    /// A publish has succeeded since the process started.
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<DbId>,
    /// Newest `updated_at` across stored sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
    /// Some section changed after the content the last publish read.
    pub has_unpublished_changes: bool,
}
