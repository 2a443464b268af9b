use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use folio_core::render::EscapePolicy;

/// Default bound on the staging step of a publish.
const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

/// Where and how pages are published.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Directory the page paths are relative to.
    pub site_root: PathBuf,
    /// Page files to publish into, relative to `site_root`.
    pub pages: Vec<String>,
    /// Upper bound on staging all temp files.
    pub write_timeout: Duration,
    /// Escaping applied to plain-text and URL slots.
    pub escape: EscapePolicy,
}

impl PublishConfig {
    /// Config with default timeout and raw escaping.
    pub fn new(site_root: impl Into<PathBuf>, pages: Vec<String>) -> Self {
        Self {
            site_root: site_root.into(),
            pages,
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
            escape: EscapePolicy::Raw,
        }
    }

    /// Load publish configuration from environment variables.
    ///
    /// | Env Var                      | Default      |
    /// |------------------------------|--------------|
    /// | `SITE_ROOT`                  | `./site`     |
    /// | `PUBLISH_PAGES`              | `index.html` |
    /// | `PUBLISH_WRITE_TIMEOUT_SECS` | `10`         |
    /// | `PUBLISH_ESCAPE_PLAIN_TEXT`  | `false`      |
    ///
    /// # Panics
    ///
    /// Panics if a value does not parse, no page is listed, or a page path
    /// escapes `SITE_ROOT`.
    pub fn from_env() -> Self {
        let site_root = std::env::var("SITE_ROOT").unwrap_or_else(|_| "./site".into());

        let pages: Vec<String> = std::env::var("PUBLISH_PAGES")
            .unwrap_or_else(|_| "index.html".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        assert!(!pages.is_empty(), "PUBLISH_PAGES must list at least one page");
        for page in &pages {
            assert!(
                is_contained(page),
                "PUBLISH_PAGES entry '{page}' must be a relative path inside SITE_ROOT"
            );
        }

        let write_timeout_secs: u64 = std::env::var("PUBLISH_WRITE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_WRITE_TIMEOUT_SECS.to_string())
            .parse()
            .expect("PUBLISH_WRITE_TIMEOUT_SECS must be a valid u64");

        let escape_plain_text: bool = std::env::var("PUBLISH_ESCAPE_PLAIN_TEXT")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("PUBLISH_ESCAPE_PLAIN_TEXT must be true or false");

        Self {
            site_root: PathBuf::from(site_root),
            pages,
            write_timeout: Duration::from_secs(write_timeout_secs),
            escape: if escape_plain_text {
                EscapePolicy::EscapePlainText
            } else {
                EscapePolicy::Raw
            },
        }
    }

    /// Normalized name and filesystem path of every page.
    ///
    /// `.` components are dropped and repeated entries naming the same file
    /// are listed once, in first-seen order.
    pub fn page_paths(&self) -> Vec<(String, PathBuf)> {
        let mut seen = HashSet::new();
        self.pages
            .iter()
            .map(|page| normalize(page))
            .filter(|relative| seen.insert(relative.clone()))
            .map(|relative| {
                let name = relative.to_string_lossy().into_owned();
                (name, self.site_root.join(relative))
            })
            .collect()
    }
}

fn normalize(page: &str) -> PathBuf {
    Path::new(page)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// True when `page` is relative and never climbs above its root.
pub fn is_contained(page: &str) -> bool {
    let path = Path::new(page);
    !page.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
