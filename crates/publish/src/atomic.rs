//! Staged, all-or-nothing replacement of a set of files.
//!
//! Every page is first written to a temp file beside its destination and
//! fsync'd. Only once every temp file is staged are they renamed into place.
//! A reader therefore sees either the old file or the new one, never a
//! partial write.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use folio_core::error::CoreError;
use uuid::Uuid;

/// One destination to replace.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub dest: PathBuf,
    temp: PathBuf,
    contents: Vec<u8>,
    original: Vec<u8>,
}

impl PendingWrite {
    /// `original` holds the current bytes at `dest`, restored if a later
    /// rename in the same batch fails.
    pub fn new(dest: PathBuf, contents: Vec<u8>, original: Vec<u8>) -> Self {
        let temp = temp_path_for(&dest);
        Self {
            dest,
            temp,
            contents,
            original,
        }
    }
}

/// `dir/.{file_name}.{uuid}.tmp`, beside `dest` so the rename stays on one
/// filesystem.
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".into());
    dest.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}

/// Cancels a staging run; the run removes anything it wrote after noticing.
#[derive(Debug, Clone, Default)]
pub struct StageCancel(Arc<AtomicBool>);

impl StageCancel {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Write and fsync every temp file.
///
/// Runs on the blocking pool. On error, or once `cancel` is set, every temp
/// file of the batch is removed before returning.
pub async fn stage_all(writes: Arc<Vec<PendingWrite>>, cancel: StageCancel) -> Result<(), CoreError> {
    tokio::task::spawn_blocking(move || {
        let result = stage_blocking(&writes, &cancel);
        if result.is_err() || cancel.is_cancelled() {
            remove_temps(&writes);
        }
        result
    })
    .await
    .map_err(|e| CoreError::Write(format!("staging task failed: {e}")))?
}

fn stage_blocking(writes: &[PendingWrite], cancel: &StageCancel) -> Result<(), CoreError> {
    for write in writes {
        if cancel.is_cancelled() {
            return Err(CoreError::Write("staging cancelled".into()));
        }
        let mut file = std::fs::File::create(&write.temp).map_err(|e| {
            CoreError::Write(format!("failed to create {}: {e}", write.temp.display()))
        })?;
        file.write_all(&write.contents)
            .and_then(|_| file.sync_all())
            .map_err(|e| CoreError::Write(format!("failed to write {}: {e}", write.temp.display())))?;
    }
    Ok(())
}

fn remove_temps(writes: &[PendingWrite]) {
    for write in writes {
        match std::fs::remove_file(&write.temp) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %write.temp.display(), error = %e, "Failed to remove temp file"),
        }
    }
}

/// Remove every temp file of the batch. Missing files are fine.
pub async fn discard_all(writes: Arc<Vec<PendingWrite>>) {
    let _ = tokio::task::spawn_blocking(move || remove_temps(&writes)).await;
}

/// Rename every staged temp file over its destination.
///
/// If a rename fails, destinations already replaced in this batch get their
/// original bytes back and the remaining temp files are removed.
pub async fn commit_all(writes: Arc<Vec<PendingWrite>>) -> Result<(), CoreError> {
    tokio::task::spawn_blocking(move || commit_blocking(&writes))
        .await
        .map_err(|e| CoreError::Write(format!("commit task failed: {e}")))?
}

fn commit_blocking(writes: &[PendingWrite]) -> Result<(), CoreError> {
    for (index, write) in writes.iter().enumerate() {
        if let Err(e) = std::fs::rename(&write.temp, &write.dest) {
            let err = CoreError::Write(format!(
                "failed to replace {}: {e}",
                write.dest.display()
            ));
            roll_back(&writes[..index]);
            remove_temps(&writes[index..]);
            return Err(err);
        }
    }
    Ok(())
}

fn roll_back(committed: &[PendingWrite]) {
    for write in committed {
        let restore = PendingWrite::new(write.dest.clone(), write.original.clone(), Vec::new());
        let result = std::fs::write(&restore.temp, &restore.contents)
            .and_then(|_| std::fs::rename(&restore.temp, &restore.dest));
        if let Err(e) = result {
            let _ = std::fs::remove_file(&restore.temp);
            tracing::error!(path = %write.dest.display(), error = %e, "Failed to restore page after aborted publish");
        }
    }
}
