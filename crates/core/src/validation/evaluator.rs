//! Rule evaluator. Pure logic, no store access.

use serde_json::{Map, Value};
use validator::{ValidateEmail, ValidateUrl};

use super::rules::{FieldError, FieldKind, FieldRule, ValidationResult};
use crate::error::CoreError;
use crate::section::SectionTag;

/// Field path reported when the payload itself is not a JSON object.
pub const ROOT_FIELD: &str = "(root)";

/// Validate a proposed payload for `tag` against its rule table.
///
/// Unknown fields are ignored. Each violated rule contributes exactly one
/// error; list items are checked individually and addressed by index.
pub fn validate(tag: SectionTag, data: &Value) -> ValidationResult {
    let Some(map) = data.as_object() else {
        return ValidationResult::from_errors(vec![FieldError::new(
            ROOT_FIELD,
            "must be a JSON object",
        )]);
    };

    let mut errors = Vec::new();
    evaluate_rules(tag.rules(), map, "", &mut errors);
    ValidationResult::from_errors(errors)
}

/// Like [`validate`], for a tag that has not been parsed yet.
///
/// Fails only when `tag` names no known section.
pub fn validate_tag(tag: &str, data: &Value) -> Result<ValidationResult, CoreError> {
    let tag: SectionTag = tag.parse()?;
    Ok(validate(tag, data))
}

fn evaluate_rules(
    rules: &[FieldRule],
    data: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) {
    for rule in rules {
        let path = join_path(prefix, rule.field);
        evaluate_single_rule(rule, data.get(rule.field), &path, errors);
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn evaluate_single_rule(
    rule: &FieldRule,
    value: Option<&Value>,
    path: &str,
    errors: &mut Vec<FieldError>,
) {
    if is_absent(value) {
        if rule.required {
            errors.push(FieldError::new(path, "is required"));
        }
        return;
    }
    let Some(value) = value else { return };

    match rule.kind {
        FieldKind::Text | FieldKind::RichText => {
            if !value.is_string() {
                errors.push(FieldError::new(path, "must be a string"));
            }
        }
        FieldKind::Url => {
            if !value.as_str().is_some_and(is_acceptable_url) {
                errors.push(FieldError::new(path, "must be a valid URL"));
            }
        }
        FieldKind::Email => {
            let valid = match value {
                Value::String(s) => s.validate_email(),
                _ => false,
            };
            if !valid {
                errors.push(FieldError::new(path, "must be a valid email address"));
            }
        }
        FieldKind::Integer => {
            if !value.is_i64() {
                errors.push(FieldError::new(path, "must be an integer"));
            }
        }
        FieldKind::DisplayOrder => {
            let fits = value.as_u64().is_some_and(|n| n <= u64::from(u32::MAX));
            if !fits {
                errors.push(FieldError::new(path, "must be a non-negative integer"));
            }
        }
        FieldKind::List { item, max_items } => {
            let Some(items) = value.as_array() else {
                errors.push(FieldError::new(path, "must be a list"));
                return;
            };
            if let Some(max) = max_items {
                if items.len() > max {
                    errors.push(FieldError::new(
                        path,
                        format!("must contain at most {max} items"),
                    ));
                }
            }
            for (index, entry) in items.iter().enumerate() {
                let entry_path = format!("{path}.{index}");
                match entry.as_object() {
                    Some(obj) => evaluate_rules(item, obj, &entry_path, errors),
                    None => errors.push(FieldError::new(entry_path, "must be an object")),
                }
            }
        }
        FieldKind::Object(rules) => match value.as_object() {
            Some(obj) => evaluate_rules(rules, obj, path, errors),
            None => errors.push(FieldError::new(path, "must be an object")),
        },
    }
}

/// Absolute URLs are checked by the `validator` crate; site-relative paths
/// and fragments are accepted as long as they contain no whitespace.
fn is_acceptable_url(url: &str) -> bool {
    if url.chars().any(char::is_whitespace) {
        return false;
    }
    let relative = ["/", "./", "../", "#"]
        .iter()
        .any(|prefix| url.starts_with(prefix));
    relative || url.to_string().validate_url()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn fields(result: &ValidationResult) -> Vec<&str> {
        result.errors().iter().map(|e| e.field.as_str()).collect()
    }

    fn valid_payload(tag: SectionTag) -> Value {
        match tag {
            SectionTag::Hero => json!({
                "title": "Design that ships",
                "description": "<p>Studio</p>",
                "videoUrl": "https://cdn.example.com/reel.mp4"
            }),
            SectionTag::Brands => json!({
                "title": "Clients",
                "logos": [{"id": 1, "name": "Acme", "logoUrl": "/img/acme.svg", "displayOrder": 1}]
            }),
            SectionTag::Services => json!({
                "services": [{"id": 1, "title": "Branding", "link": "#branding"}]
            }),
            SectionTag::Work => json!({
                "items": [{"id": 1, "title": "Case study", "imageUrl": "./img/case.jpg"}]
            }),
            SectionTag::Offer => json!({
                "title": "What you get",
                "points": [{"id": 1, "text": "Strategy"}, {"id": 2, "text": "Design"}]
            }),
            SectionTag::Testimonials => json!({
                "testimonials": [{"id": 1, "text": "Great", "clientName": "Sam", "displayOrder": 0}]
            }),
            SectionTag::Footer => json!({
                "email": "hello@example.com",
                "links": {"social": [{"text": "Dribbble", "url": "https://dribbble.com/studio"}]}
            }),
            SectionTag::Projects => json!({
                "projects": [{"id": 4, "title": "Atlas", "link": "../atlas.html"}]
            }),
            SectionTag::Approach => json!({
                "title": "How we work",
                "ctaUrl": "/contact",
                "steps": [{"id": 1, "title": "Discover", "number": "01"}]
            }),
        }
    }

    #[test]
    fn every_section_accepts_a_valid_payload() {
        for tag in SectionTag::ALL {
            let result = validate(tag, &valid_payload(tag));
            assert!(result.is_valid(), "{tag}: {:?}", result.errors());
        }
    }

    #[test]
    fn missing_required_field_is_named() {
        for tag in SectionTag::ALL {
            for rule in tag.rules().iter().filter(|r| r.required) {
                let mut payload = valid_payload(tag);
                payload.as_object_mut().unwrap().remove(rule.field);
                let result = validate(tag, &payload);
                assert!(fields(&result).contains(&rule.field), "{tag}.{}", rule.field);
            }
        }
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let result = validate(SectionTag::Hero, &json!({"title": ""}));
        assert_eq!(result.errors(), &[FieldError::new("title", "is required")]);
    }

    #[test]
    fn wrong_type_is_reported_once() {
        let result = validate(SectionTag::Hero, &json!({"title": 123}));
        assert_eq!(result.errors(), &[FieldError::new("title", "must be a string")]);
    }

    #[test]
    fn nested_paths_use_list_indexes() {
        let payload = json!({
            "testimonials": [
                {"id": 1, "text": "Fine", "clientName": "A"},
                {"id": 2, "text": "Also fine"}
            ]
        });
        let result = validate(SectionTag::Testimonials, &payload);
        assert_eq!(fields(&result), vec!["testimonials.1.clientName"]);
    }

    #[test]
    fn nested_object_paths_are_dot_joined() {
        let payload = json!({"links": {"site": [{"text": "Home", "url": "not a url"}]}});
        let result = validate(SectionTag::Footer, &payload);
        assert_eq!(fields(&result), vec!["links.site.0.url"]);
    }

    #[test]
    fn offer_points_are_capped() {
        let points: Vec<Value> = (1..=7).map(|i| json!({"id": i, "text": "p"})).collect();
        let result = validate(SectionTag::Offer, &json!({"title": "Offer", "points": points}));
        assert_eq!(fields(&result), vec!["points"]);
    }

    #[test]
    fn display_order_must_be_non_negative() {
        let payload = json!({"logos": [{"id": 1, "name": "A", "logoUrl": "/a.svg", "displayOrder": -1}]});
        let result = validate(SectionTag::Brands, &payload);
        assert_eq!(fields(&result), vec!["logos.0.displayOrder"]);
    }

    #[test]
    fn ids_beyond_i64_are_rejected() {
        let payload = json!({"services": [{"id": 18446744073709551615_u64, "title": "X"}]});
        let result = validate(SectionTag::Services, &payload);
        assert_eq!(
            result.errors(),
            &[FieldError::new("services.0.id", "must be an integer")]
        );
    }

    #[test]
    fn null_optional_field_is_absent() {
        let result = validate(SectionTag::Hero, &json!({"title": "A", "videoUrl": null}));
        assert!(result.is_valid());
    }

    #[test]
    fn urls_accept_absolute_and_site_relative() {
        assert!(is_acceptable_url("https://example.com/a"));
        assert!(is_acceptable_url("/images/a.png"));
        assert!(is_acceptable_url("#contact"));
        assert!(!is_acceptable_url("images a.png"));
        assert!(!is_acceptable_url("just-text"));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let result = validate(SectionTag::Footer, &json!({"email": "nobody"}));
        assert_eq!(fields(&result), vec!["email"]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let result = validate(SectionTag::Hero, &json!({"title": "A", "legacyBanner": 5}));
        assert!(result.is_valid());
    }

    #[test]
    fn non_object_payload_reports_root() {
        let result = validate(SectionTag::Hero, &json!(["title"]));
        assert_eq!(fields(&result), vec![ROOT_FIELD]);
    }

    #[test]
    fn validate_tag_rejects_unknown_section() {
        assert_matches!(
            validate_tag("sidebar", &json!({})),
            Err(CoreError::NotFound { .. })
        );
        assert!(validate_tag("hero", &json!({"title": "A"})).unwrap().is_valid());
    }
}
