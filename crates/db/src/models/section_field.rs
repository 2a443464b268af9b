//! Row type for the `section_fields` table.

use std::collections::BTreeMap;

use folio_core::error::CoreError;
use folio_core::section::{Fields, Section, SectionTag};
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One stored field of one section.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SectionFieldRow {
    pub id: DbId,
    pub section: String,
    pub field_name: String,
    pub field_value: serde_json::Value,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Write DTO
// ---------------------------------------------------------------------------

/// A field to insert or update.
#[derive(Debug, Clone)]
pub struct FieldWrite {
    pub field_name: String,
    pub field_value: serde_json::Value,
    pub display_order: i32,
}

impl FieldWrite {
    /// Build writes for every field of `fields`, ordered by the section's
    /// rule table.
    pub fn for_section(tag: SectionTag, fields: Fields) -> Vec<Self> {
        fields
            .into_iter()
            .map(|(field_name, field_value)| Self {
                display_order: tag.field_position(&field_name),
                field_name,
                field_value,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Group field rows into sections, in site order.
///
/// A section's `created_at` is its oldest row and `updated_at` its newest.
pub fn assemble_sections(rows: Vec<SectionFieldRow>) -> Result<Vec<Section>, CoreError> {
    let mut sections: BTreeMap<SectionTag, Section> = BTreeMap::new();

    for row in rows {
        let tag: SectionTag = row.section.parse().map_err(|_| {
            CoreError::Store(format!("unknown section '{}' in section_fields", row.section))
        })?;
        let section = sections.entry(tag).or_insert_with(|| Section {
            section: tag,
            fields: Fields::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        });
        section.created_at = section.created_at.min(row.created_at);
        section.updated_at = section.updated_at.max(row.updated_at);
        section.fields.insert(row.field_name, row.field_value);
    }

    Ok(sections.into_values().collect())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use super::*;

    fn row(section: &str, field: &str, value: serde_json::Value, age_mins: i64) -> SectionFieldRow {
        let at = Utc::now() - Duration::minutes(age_mins);
        SectionFieldRow {
            id: 0,
            section: section.to_string(),
            field_name: field.to_string(),
            field_value: value,
            display_order: 0,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn rows_group_into_sections_in_site_order() {
        let rows = vec![
            row("offer", "title", json!("Offer"), 1),
            row("hero", "title", json!("A"), 10),
            row("hero", "videoUrl", json!("/v.mp4"), 2),
        ];
        let sections = assemble_sections(rows).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section, SectionTag::Hero);
        assert_eq!(sections[0].fields["videoUrl"], "/v.mp4");
        assert!(sections[0].created_at < sections[0].updated_at);
        assert_eq!(sections[1].section, SectionTag::Offer);
    }

    #[test]
    fn unknown_section_is_a_store_error() {
        let result = assemble_sections(vec![row("sidebar", "title", json!("x"), 0)]);
        assert!(matches!(result, Err(CoreError::Store(_))));
    }

    #[test]
    fn writes_take_rule_table_positions() {
        let fields = json!({"videoUrl": "/v.mp4", "title": "A"});
        let writes = FieldWrite::for_section(
            SectionTag::Hero,
            fields.as_object().cloned().unwrap(),
        );
        let title = writes.iter().find(|w| w.field_name == "title").unwrap();
        let video = writes.iter().find(|w| w.field_name == "videoUrl").unwrap();
        assert_eq!((title.display_order, video.display_order), (1, 3));
    }
}
