use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::section::content::{
    Approach, Brands, Footer, Hero, Offer, Projects, SectionSchema, Services, Testimonials, Work,
};
use crate::validation::FieldRule;

/// Identifier of an independently editable unit of site content.
///
/// The variant order is the order sections appear on the site and the order
/// they are fetched, validated and rendered during a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTag {
    Hero,
    Brands,
    Services,
    Work,
    Offer,
    Testimonials,
    Footer,
    Projects,
    Approach,
}

impl SectionTag {
    pub const ALL: [SectionTag; 9] = [
        SectionTag::Hero,
        SectionTag::Brands,
        SectionTag::Services,
        SectionTag::Work,
        SectionTag::Offer,
        SectionTag::Testimonials,
        SectionTag::Footer,
        SectionTag::Projects,
        SectionTag::Approach,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionTag::Hero => "hero",
            SectionTag::Brands => "brands",
            SectionTag::Services => "services",
            SectionTag::Work => "work",
            SectionTag::Offer => "offer",
            SectionTag::Testimonials => "testimonials",
            SectionTag::Footer => "footer",
            SectionTag::Projects => "projects",
            SectionTag::Approach => "approach",
        }
    }

    /// Rule table for this section, owned by the section's typed struct.
    pub fn rules(self) -> &'static [FieldRule] {
        match self {
            SectionTag::Hero => Hero::RULES,
            SectionTag::Brands => Brands::RULES,
            SectionTag::Services => Services::RULES,
            SectionTag::Work => Work::RULES,
            SectionTag::Offer => Offer::RULES,
            SectionTag::Testimonials => Testimonials::RULES,
            SectionTag::Footer => Footer::RULES,
            SectionTag::Projects => Projects::RULES,
            SectionTag::Approach => Approach::RULES,
        }
    }

    /// Position of a top-level field in the rule table.
    ///
    /// Used as the stored `display_order` of a field row; unknown fields sort last.
    pub fn field_position(self, field: &str) -> i32 {
        self.rules()
            .iter()
            .position(|rule| rule.field == field)
            .map_or(i32::MAX, |pos| pos as i32 + 1)
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| CoreError::not_found("Section", s))
    }
}
