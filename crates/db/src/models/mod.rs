pub mod homepage_version;
pub mod section_field;
