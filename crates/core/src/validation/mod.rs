//! Section validation.
//!
//! Rule types and a pure evaluator that checks a proposed payload against a
//! section's rule table. Expected shape problems are reported through
//! [`ValidationResult`], never as errors.

pub mod evaluator;
pub mod rules;

pub use evaluator::{validate, validate_tag, ROOT_FIELD};
pub use rules::{FieldError, FieldKind, FieldRule, ValidationResult};
