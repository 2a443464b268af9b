//! HTML fragment rendering for sections.
//!
//! Every section has a fixed template with `{{name}}` placeholders. Rendering
//! is pure: the same content always yields the same bytes, and no I/O happens
//! here. List items are sorted by `displayOrder` and rendered into per-item
//! fragments that are concatenated into the parent template.
//!
//! # Escaping
//!
//! Content is inserted raw by default ([`EscapePolicy::Raw`]); editors are
//! trusted and some plain-text fields carry inline markup on the live site.
//! [`EscapePolicy::EscapePlainText`] HTML-escapes plain-text and URL slots.
//! Rich-text slots and child fragments are never escaped under either policy.

mod escape;
mod sections;
pub mod template;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use escape::escape_html;

use crate::error::CoreError;
use crate::section::{SectionContent, SectionTag};

/// How plain-text and URL values are inserted into templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapePolicy {
    #[default]
    Raw,
    EscapePlainText,
}

/// Renders typed section content into HTML fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    policy: EscapePolicy,
}

impl Renderer {
    pub fn new(policy: EscapePolicy) -> Self {
        Self { policy }
    }

    pub fn render(&self, content: &SectionContent) -> String {
        match content {
            SectionContent::Hero(c) => sections::hero(self, c),
            SectionContent::Brands(c) => sections::brands(self, c),
            SectionContent::Services(c) => sections::services(self, c),
            SectionContent::Work(c) => sections::work(self, c),
            SectionContent::Offer(c) => sections::offer(self, c),
            SectionContent::Testimonials(c) => sections::testimonials(self, c),
            SectionContent::Footer(c) => sections::footer(self, c),
            SectionContent::Projects(c) => sections::projects(self, c),
            SectionContent::Approach(c) => sections::approach(self, c),
        }
    }

    /// Parse `value` as content for `tag` and render it.
    pub fn render_value(&self, tag: SectionTag, value: &Value) -> Result<String, CoreError> {
        let content = SectionContent::from_value(tag, value.clone())?;
        Ok(self.render(&content))
    }

    /// Plain-text slot.
    fn text<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self.policy {
            EscapePolicy::Raw => Cow::Borrowed(value),
            EscapePolicy::EscapePlainText => Cow::Owned(escape_html(value)),
        }
    }

    /// URL slot; escaped like plain text.
    fn url<'a>(&self, value: &'a str) -> Cow<'a, str> {
        self.text(value)
    }
}

/// Render with the default [`EscapePolicy::Raw`] policy.
pub fn render(content: &SectionContent) -> String {
    Renderer::default().render(content)
}

/// Render a JSON payload with the default policy.
pub fn render_value(tag: SectionTag, value: &Value) -> Result<String, CoreError> {
    Renderer::default().render_value(tag, value)
}
