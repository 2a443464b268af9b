use crate::section::SectionTag;
use crate::types::DbId;
use crate::validation::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Field-level violations for one section payload.
    #[error("Invalid {section} content: {} field error(s)", .errors.len())]
    InvalidContent {
        section: SectionTag,
        errors: Vec<FieldError>,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A stored snapshot could not be decoded or failed its checksum.
    #[error("Snapshot of version {version_id} is corrupt: {reason}")]
    CorruptSnapshot { version_id: DbId, reason: String },

    /// Creating or restoring a snapshot failed; nothing was applied.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Writing a published artifact failed; the previous artifact is intact.
    #[error("Write error: {0}")]
    Write(String),

    /// The content store backend failed.
    #[error("Content store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
