//! Domain logic for the portfolio CMS.
//!
//! Everything in this crate is free of HTTP and SQL concerns: typed section
//! content, the validation rule tables, the HTML template renderer, the
//! snapshot format, and the [`store::ContentStore`] boundary together with an
//! in-memory implementation.

pub mod error;
pub mod render;
pub mod roles;
pub mod section;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod validation;
