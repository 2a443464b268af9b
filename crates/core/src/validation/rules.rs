//! Rule and result types for section validation.

use serde::{Deserialize, Serialize};

/// Shape a field value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text slot.
    Text,
    /// HTML-bearing text; never escaped on render.
    RichText,
    /// Absolute URL or site-relative path.
    Url,
    Email,
    Integer,
    /// Non-negative integer that fits in `u32`.
    DisplayOrder,
    /// Array of objects, each checked against `item`.
    List {
        item: &'static [FieldRule],
        max_items: Option<usize>,
    },
    /// Nested object checked against its own rules.
    Object(&'static [FieldRule]),
}

/// One entry of a section's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn required(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            required: true,
            kind,
        }
    }

    pub const fn optional(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            required: false,
            kind,
        }
    }
}

/// A single violated rule, addressed by dot-joined field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating one payload.
///
/// `is_valid` is derived from `errors` at construction and cannot disagree
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}
