//! Content sections: tags, typed content and the stored record.

pub mod brands;
pub mod content;
pub mod tag;

use serde::{Deserialize, Serialize};

pub use brands::NewLogo;
pub use content::{SectionContent, SectionSchema};
pub use tag::SectionTag;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Field name to JSON value, as stored for one section.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A section as held by the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section: SectionTag,
    pub fields: Fields,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Section {
    /// A section with no stored fields.
    ///
    /// Stores keep no record of such a section; this is what an upsert of an
    /// empty field map into a section that does not exist yet returns.
    pub fn empty(tag: SectionTag, at: Timestamp) -> Self {
        Self {
            section: tag,
            fields: Fields::new(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Typed view of the stored fields.
    pub fn content(&self) -> Result<SectionContent, CoreError> {
        SectionContent::from_fields(self.section, &self.fields)
    }
}
