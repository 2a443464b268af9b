//! In-process lock registry keyed by page path.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per page path. Callers pass normalized paths (see
/// [`PublishConfig::page_paths`](crate::config::PublishConfig::page_paths)).
///
/// Publishes that touch the same page serialize here. Locks are always taken
/// in sorted path order, so two publishes over overlapping page sets cannot
/// deadlock.
#[derive(Default)]
pub struct PageLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

/// Guards for every locked page; dropping it releases them all.
pub struct PageGuards {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl PageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every path in `paths`, waiting for any publish that holds one.
    pub async fn acquire(&self, paths: &[PathBuf]) -> PageGuards {
        let mut sorted: Vec<PathBuf> = paths.to_vec();
        sorted.sort();
        sorted.dedup();

        let handles: Vec<Arc<Mutex<()>>> = {
            let mut locks = self.locks.lock().await;
            sorted
                .into_iter()
                .map(|path| Arc::clone(locks.entry(path).or_default()))
                .collect()
        };

        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        PageGuards { _guards: guards }
    }

    /// Number of distinct paths ever locked.
    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
