//! Typed content for every section.
//!
//! Each struct owns its validation rule table through [`SectionSchema`], so a
//! field added to a struct without a matching rule (or the reverse) shows up in
//! the schema tests below rather than at publish time. JSON field names are
//! camelCase; absent fields deserialize to empty defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::section::{Fields, SectionTag};
use crate::validation::{FieldError, FieldKind, FieldRule};

/// Binds a typed section struct to its tag and rule table.
pub trait SectionSchema: Serialize + DeserializeOwned + Default + Into<SectionContent> {
    const TAG: SectionTag;
    const RULES: &'static [FieldRule];
}

/// List items that render in `displayOrder` order.
pub trait Ordered {
    fn display_order(&self) -> u32;
}

/// Borrow `items` sorted by ascending display order; ties keep input order.
pub fn sorted_by_display_order<T: Ordered>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.display_order());
    sorted
}

const ORDER: FieldRule = FieldRule::optional("displayOrder", FieldKind::DisplayOrder);

// ---------------------------------------------------------------------------
// hero
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub title: String,
    pub description: String,
    pub video_url: String,
}

impl SectionSchema for Hero {
    const TAG: SectionTag = SectionTag::Hero;
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("title", FieldKind::Text),
        FieldRule::optional("description", FieldKind::RichText),
        FieldRule::optional("videoUrl", FieldKind::Url),
    ];
}

// ---------------------------------------------------------------------------
// brands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandLogo {
    pub id: i64,
    pub name: String,
    pub logo_url: String,
    pub display_order: u32,
}

const LOGO_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Integer),
    FieldRule::required("name", FieldKind::Text),
    FieldRule::required("logoUrl", FieldKind::Url),
    ORDER,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brands {
    pub title: String,
    pub logos: Vec<BrandLogo>,
}

impl SectionSchema for Brands {
    const TAG: SectionTag = SectionTag::Brands;
    const RULES: &'static [FieldRule] = &[
        FieldRule::optional("title", FieldKind::Text),
        FieldRule::optional(
            "logos",
            FieldKind::List {
                item: LOGO_RULES,
                max_items: None,
            },
        ),
    ];
}

// ---------------------------------------------------------------------------
// services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceItem {
    pub id: i64,
    pub title: String,
    pub number: String,
    pub description: String,
    pub link: String,
    pub color_class: String,
    pub display_order: u32,
}

const SERVICE_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Integer),
    FieldRule::required("title", FieldKind::Text),
    FieldRule::optional("number", FieldKind::Text),
    FieldRule::optional("description", FieldKind::RichText),
    FieldRule::optional("link", FieldKind::Url),
    FieldRule::optional("colorClass", FieldKind::Text),
    ORDER,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Services {
    pub title: String,
    pub description: String,
    pub services: Vec<ServiceItem>,
}

impl SectionSchema for Services {
    const TAG: SectionTag = SectionTag::Services;
    const RULES: &'static [FieldRule] = &[
        FieldRule::optional("title", FieldKind::Text),
        FieldRule::optional("description", FieldKind::RichText),
        FieldRule::optional(
            "services",
            FieldKind::List {
                item: SERVICE_RULES,
                max_items: None,
            },
        ),
    ];
}

// ---------------------------------------------------------------------------
// work
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkItem {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub link: String,
    pub display_order: u32,
}

const WORK_ITEM_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Integer),
    FieldRule::required("title", FieldKind::Text),
    FieldRule::optional("category", FieldKind::Text),
    FieldRule::optional("imageUrl", FieldKind::Url),
    FieldRule::optional("link", FieldKind::Url),
    ORDER,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Work {
    pub title: String,
    pub description: String,
    pub items: Vec<WorkItem>,
}

impl SectionSchema for Work {
    const TAG: SectionTag = SectionTag::Work;
    const RULES: &'static [FieldRule] = &[
        FieldRule::optional("title", FieldKind::Text),
        FieldRule::optional("description", FieldKind::RichText),
        FieldRule::optional(
            "items",
            FieldKind::List {
                item: WORK_ITEM_RULES,
                max_items: None,
            },
        ),
    ];
}

// ---------------------------------------------------------------------------
// offer
// ---------------------------------------------------------------------------

/// Maximum number of offer points the layout has room for.
pub const MAX_OFFER_POINTS: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferPoint {
    pub id: i64,
    pub text: String,
    pub display_order: u32,
}

const OFFER_POINT_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Integer),
    FieldRule::required("text", FieldKind::Text),
    ORDER,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Offer {
    pub title: String,
    pub points: Vec<OfferPoint>,
}

impl SectionSchema for Offer {
    const TAG: SectionTag = SectionTag::Offer;
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("title", FieldKind::Text),
        FieldRule::optional(
            "points",
            FieldKind::List {
                item: OFFER_POINT_RULES,
                max_items: Some(MAX_OFFER_POINTS),
            },
        ),
    ];
}

// ---------------------------------------------------------------------------
// testimonials
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonial {
    pub id: i64,
    pub text: String,
    pub client_name: String,
    pub client_title: String,
    pub client_photo: String,
    pub project_link: String,
    pub project_image: String,
    pub display_order: u32,
}

const TESTIMONIAL_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Integer),
    FieldRule::required("text", FieldKind::RichText),
    FieldRule::required("clientName", FieldKind::Text),
    FieldRule::optional("clientTitle", FieldKind::Text),
    FieldRule::optional("clientPhoto", FieldKind::Url),
    FieldRule::optional("projectLink", FieldKind::Url),
    FieldRule::optional("projectImage", FieldKind::Url),
    ORDER,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonials {
    pub title: String,
    pub testimonials: Vec<Testimonial>,
}

impl SectionSchema for Testimonials {
    const TAG: SectionTag = SectionTag::Testimonials;
    const RULES: &'static [FieldRule] = &[
        FieldRule::optional("title", FieldKind::Text),
        FieldRule::optional(
            "testimonials",
            FieldKind::List {
                item: TESTIMONIAL_RULES,
                max_items: None,
            },
        ),
    ];
}

// ---------------------------------------------------------------------------
// footer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterLinks {
    pub site: Vec<FooterLink>,
    pub professional: Vec<FooterLink>,
    pub social: Vec<FooterLink>,
}

const FOOTER_LINK_RULES: &[FieldRule] = &[
    FieldRule::required("text", FieldKind::Text),
    FieldRule::required("url", FieldKind::Url),
];

const FOOTER_LINK_LIST: FieldKind = FieldKind::List {
    item: FOOTER_LINK_RULES,
    max_items: None,
};

const FOOTER_LINKS_RULES: &[FieldRule] = &[
    FieldRule::optional("site", FOOTER_LINK_LIST),
    FieldRule::optional("professional", FOOTER_LINK_LIST),
    FieldRule::optional("social", FOOTER_LINK_LIST),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    pub title: String,
    pub email: String,
    pub copyright: String,
    pub links: FooterLinks,
}

impl SectionSchema for Footer {
    const TAG: SectionTag = SectionTag::Footer;
    const RULES: &'static [FieldRule] = &[
        FieldRule::optional("title", FieldKind::Text),
        FieldRule::optional("email", FieldKind::Email),
        FieldRule::optional("copyright", FieldKind::Text),
        FieldRule::optional("links", FieldKind::Object(FOOTER_LINKS_RULES)),
    ];
}

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectCard {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub image_url: String,
    pub link: String,
    pub display_order: u32,
}

const PROJECT_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Integer),
    FieldRule::required("title", FieldKind::Text),
    FieldRule::optional("summary", FieldKind::RichText),
    FieldRule::optional("imageUrl", FieldKind::Url),
    FieldRule::optional("link", FieldKind::Url),
    ORDER,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Projects {
    pub title: String,
    pub projects: Vec<ProjectCard>,
}

impl SectionSchema for Projects {
    const TAG: SectionTag = SectionTag::Projects;
    const RULES: &'static [FieldRule] = &[
        FieldRule::optional("title", FieldKind::Text),
        FieldRule::optional(
            "projects",
            FieldKind::List {
                item: PROJECT_RULES,
                max_items: None,
            },
        ),
    ];
}

// ---------------------------------------------------------------------------
// approach
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApproachStep {
    pub id: i64,
    pub title: String,
    pub number: String,
    pub description: String,
    pub display_order: u32,
}

const STEP_RULES: &[FieldRule] = &[
    FieldRule::required("id", FieldKind::Integer),
    FieldRule::required("title", FieldKind::Text),
    FieldRule::optional("number", FieldKind::Text),
    FieldRule::optional("description", FieldKind::RichText),
    ORDER,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Approach {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub cta_text: String,
    pub cta_url: String,
    pub steps: Vec<ApproachStep>,
}

impl SectionSchema for Approach {
    const TAG: SectionTag = SectionTag::Approach;
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("title", FieldKind::Text),
        FieldRule::optional("description", FieldKind::RichText),
        FieldRule::optional("videoUrl", FieldKind::Url),
        FieldRule::optional("ctaText", FieldKind::Text),
        FieldRule::optional("ctaUrl", FieldKind::Url),
        FieldRule::optional(
            "steps",
            FieldKind::List {
                item: STEP_RULES,
                max_items: None,
            },
        ),
    ];
}

macro_rules! impl_ordered {
    ($($ty:ty),* $(,)?) => {
        $(impl Ordered for $ty {
            fn display_order(&self) -> u32 {
                self.display_order
            }
        })*
    };
}

impl_ordered!(BrandLogo, ServiceItem, WorkItem, OfferPoint, Testimonial, ProjectCard, ApproachStep);

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// Typed content of one section, one variant per [`SectionTag`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Hero(Hero),
    Brands(Brands),
    Services(Services),
    Work(Work),
    Offer(Offer),
    Testimonials(Testimonials),
    Footer(Footer),
    Projects(Projects),
    Approach(Approach),
}

macro_rules! impl_into_content {
    ($($variant:ident),* $(,)?) => {
        $(impl From<$variant> for SectionContent {
            fn from(value: $variant) -> Self {
                SectionContent::$variant(value)
            }
        })*
    };
}

impl_into_content!(Hero, Brands, Services, Work, Offer, Testimonials, Footer, Projects, Approach);

/// Drop `null` members from every object so they fall back to the field
/// default, matching the validator which treats `null` as absent.
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

fn parse<T: SectionSchema>(value: Value) -> Result<SectionContent, CoreError> {
    serde_json::from_value::<T>(strip_nulls(value))
        .map(Into::into)
        .map_err(|e| CoreError::InvalidContent {
            section: T::TAG,
            errors: vec![FieldError::new("(root)", e.to_string())],
        })
}

impl SectionContent {
    pub fn tag(&self) -> SectionTag {
        match self {
            SectionContent::Hero(_) => SectionTag::Hero,
            SectionContent::Brands(_) => SectionTag::Brands,
            SectionContent::Services(_) => SectionTag::Services,
            SectionContent::Work(_) => SectionTag::Work,
            SectionContent::Offer(_) => SectionTag::Offer,
            SectionContent::Testimonials(_) => SectionTag::Testimonials,
            SectionContent::Footer(_) => SectionTag::Footer,
            SectionContent::Projects(_) => SectionTag::Projects,
            SectionContent::Approach(_) => SectionTag::Approach,
        }
    }

    /// Deserialize a JSON payload into the variant for `tag`.
    ///
    /// Callers are expected to have validated `value` first; a shape that
    /// still fails to deserialize is reported as [`CoreError::InvalidContent`].
    pub fn from_value(tag: SectionTag, value: Value) -> Result<Self, CoreError> {
        match tag {
            SectionTag::Hero => parse::<Hero>(value),
            SectionTag::Brands => parse::<Brands>(value),
            SectionTag::Services => parse::<Services>(value),
            SectionTag::Work => parse::<Work>(value),
            SectionTag::Offer => parse::<Offer>(value),
            SectionTag::Testimonials => parse::<Testimonials>(value),
            SectionTag::Footer => parse::<Footer>(value),
            SectionTag::Projects => parse::<Projects>(value),
            SectionTag::Approach => parse::<Approach>(value),
        }
    }

    pub fn from_fields(tag: SectionTag, fields: &Fields) -> Result<Self, CoreError> {
        Self::from_value(tag, Value::Object(fields.clone()))
    }

    /// Empty content used when a section has never been written.
    pub fn default_for(tag: SectionTag) -> Self {
        match tag {
            SectionTag::Hero => Hero::default().into(),
            SectionTag::Brands => Brands::default().into(),
            SectionTag::Services => Services::default().into(),
            SectionTag::Work => Work::default().into(),
            SectionTag::Offer => Offer::default().into(),
            SectionTag::Testimonials => Testimonials::default().into(),
            SectionTag::Footer => Footer::default().into(),
            SectionTag::Projects => Projects::default().into(),
            SectionTag::Approach => Approach::default().into(),
        }
    }

    /// Serialize back into a field map suitable for the content store.
    pub fn to_fields(&self) -> Fields {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Fields::new(),
        }
    }
}
