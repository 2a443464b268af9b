//! Publish pipeline: version snapshots and static page generation.
//!
//! - [`versions::VersionManager`] -- create, list, inspect and restore snapshots.
//! - [`orchestrator::PublishOrchestrator`] -- validate, render, splice and
//!   atomically write the configured pages.
//! - [`anchors`], [`atomic`], [`lock`] -- the building blocks the orchestrator
//!   composes.

pub mod anchors;
pub mod atomic;
pub mod config;
pub mod lock;
pub mod orchestrator;
pub mod result;
pub mod versions;

pub use config::PublishConfig;
pub use orchestrator::PublishOrchestrator;
pub use result::{PublishRequest, PublishResult, PublishStage, PublishStatus};
pub use versions::{RestoreOptions, RestoreOutcome, VersionManager};
