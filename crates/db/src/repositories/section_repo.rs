//! Repository for the `section_fields` table.

use folio_core::types::Timestamp;
use sqlx::{PgConnection, PgPool};

use crate::models::section_field::{FieldWrite, SectionFieldRow};

/// Column list for section_fields queries.
const COLUMNS: &str = "id, section, field_name, field_value, display_order, created_at, updated_at";

/// Field-level reads and writes for content sections.
pub struct SectionRepo;

impl SectionRepo {
    /// Every field row, grouped by section then field order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SectionFieldRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM section_fields
             ORDER BY section, display_order, field_name"
        );
        sqlx::query_as::<_, SectionFieldRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Field rows of one section.
    pub async fn list_by_section(
        conn: &mut PgConnection,
        section: &str,
    ) -> Result<Vec<SectionFieldRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM section_fields
             WHERE section = $1
             ORDER BY display_order, field_name"
        );
        sqlx::query_as::<_, SectionFieldRow>(&query)
            .bind(section)
            .fetch_all(conn)
            .await
    }

    /// Insert or overwrite a single field.
    pub async fn upsert_field(
        conn: &mut PgConnection,
        section: &str,
        field: &FieldWrite,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO section_fields (section, field_name, field_value, display_order)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (section, field_name) DO UPDATE
             SET field_value = EXCLUDED.field_value,
                 display_order = EXCLUDED.display_order,
                 updated_at = NOW()",
        )
        .bind(section)
        .bind(&field.field_name)
        .bind(&field.field_value)
        .bind(field.display_order)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Replace every field of a section.
    ///
    /// The section keeps its original creation time; all rows get a fresh
    /// `updated_at`. Callers run this inside a transaction.
    pub async fn replace_section(
        conn: &mut PgConnection,
        section: &str,
        fields: &[FieldWrite],
    ) -> Result<(), sqlx::Error> {
        let (created_at,): (Option<Timestamp>,) =
            sqlx::query_as("SELECT MIN(created_at) FROM section_fields WHERE section = $1")
                .bind(section)
                .fetch_one(&mut *conn)
                .await?;

        sqlx::query("DELETE FROM section_fields WHERE section = $1")
            .bind(section)
            .execute(&mut *conn)
            .await?;

        for field in fields {
            sqlx::query(
                "INSERT INTO section_fields
                    (section, field_name, field_value, display_order, created_at)
                 VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))",
            )
            .bind(section)
            .bind(&field.field_name)
            .bind(&field.field_value)
            .bind(field.display_order)
            .bind(created_at)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
