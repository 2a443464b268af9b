//! Request handlers, one submodule per resource.
//!
//! Handlers stay thin: they parse input, check roles through the extractors,
//! delegate to the content store, version manager or publisher, and map
//! errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod brands;
pub mod publish;
pub mod sections;
pub mod versions;
