//! Serialized section graph stored with each version.
//!
//! Payload layout: `{"format": 1, "takenAt": ts, "sections": {tag: fields}}`.
//! The payload is stored as text alongside its SHA-256 checksum so that any
//! byte-level change is caught before a restore applies it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::section::{Fields, Section, SectionTag};
use crate::types::{DbId, Timestamp};

/// Current payload format.
pub const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub format: u32,
    pub taken_at: Timestamp,
    pub sections: BTreeMap<SectionTag, Fields>,
}

/// Encoded snapshot ready to persist.
#[derive(Debug, Clone)]
pub struct EncodedSnapshot {
    pub payload: String,
    pub checksum: String,
}

impl Snapshot {
    /// Capture the given sections.
    pub fn capture(sections: &[Section], taken_at: Timestamp) -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            taken_at,
            sections: sections
                .iter()
                .map(|s| (s.section, s.fields.clone()))
                .collect(),
        }
    }

    pub fn encode(&self) -> Result<EncodedSnapshot, CoreError> {
        let payload = serde_json::to_string(self)
            .map_err(|e| CoreError::Snapshot(format!("failed to serialize snapshot: {e}")))?;
        let checksum = checksum(payload.as_bytes());
        Ok(EncodedSnapshot { payload, checksum })
    }

    /// Verify `checksum` and decode `payload` stored for `version_id`.
    pub fn decode(version_id: DbId, payload: &str, expected: &str) -> Result<Self, CoreError> {
        let corrupt = |reason: String| CoreError::CorruptSnapshot { version_id, reason };

        let actual = checksum(payload.as_bytes());
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(corrupt(format!(
                "checksum mismatch (expected {expected}, computed {actual})"
            )));
        }

        let snapshot: Snapshot =
            serde_json::from_str(payload).map_err(|e| corrupt(e.to_string()))?;
        if snapshot.format != SNAPSHOT_FORMAT {
            return Err(corrupt(format!("unsupported format {}", snapshot.format)));
        }
        Ok(snapshot)
    }

    /// Sections in site order, ready for a wholesale restore.
    pub fn into_sections(self) -> Vec<(SectionTag, Fields)> {
        self.sections.into_iter().collect()
    }
}

/// SHA-256 hex digest.
pub fn checksum(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}
