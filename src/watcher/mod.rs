//! Folder watching and dispatch.
//!
//! [`FolderWatcher`] subscribes to the watch folder (non-recursive) and turns file arrivals into
//! [`DispatchHandle::submit`] calls; the [`Dispatcher`] worker applies the settle delay and runs
//! the pipeline.

mod dispatch;

use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::error::ReportResult;
use crate::ingestion::is_supported_path;

pub use dispatch::{DispatchHandle, Dispatcher};

/// Paths in `event` that are newly arrived files we can process.
///
/// Creates count, and so do renames into the folder (producers that write a temp file first).
pub fn arrivals(event: &Event) -> Vec<PathBuf> {
    let candidates: Vec<&PathBuf> = match event.kind {
        EventKind::Create(CreateKind::Folder) => Vec::new(),
        EventKind::Create(_) => event.paths.iter().collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.iter().collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.last().into_iter().collect(),
        _ => Vec::new(),
    };
    candidates
        .into_iter()
        .filter(|p| is_supported_path(p))
        .cloned()
        .collect()
}

/// Live subscription to a watch folder. Dropping it unsubscribes.
pub struct FolderWatcher {
    _watcher: RecommendedWatcher,
    folder: PathBuf,
}

impl FolderWatcher {
    /// Subscribe to `folder` and submit every arrival to `handle`.
    pub fn start(folder: &Path, handle: DispatchHandle) -> ReportResult<Self> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for path in arrivals(&event) {
                    if handle.submit(path.clone()) {
                        debug!(path = %path.display(), "queued");
                    }
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        })?;
        watcher.watch(folder, RecursiveMode::NonRecursive)?;
        info!(folder = %folder.display(), "watching for new csv files");

        Ok(Self {
            _watcher: watcher,
            folder: folder.to_path_buf(),
        })
    }

    /// Folder being watched.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Unsubscribe.
    pub fn stop(self) {
        info!(folder = %self.folder.display(), "stopped watching");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |e, p| e.add_path(PathBuf::from(p)))
    }

    #[test]
    fn creates_of_csv_files_are_arrivals() {
        let e = event(EventKind::Create(CreateKind::File), &["/w/a.csv", "/w/b.txt"]);
        assert_eq!(arrivals(&e), vec![PathBuf::from("/w/a.csv")]);
    }

    #[test]
    fn folders_and_modifications_are_ignored() {
        let e = event(EventKind::Create(CreateKind::Folder), &["/w/dir.csv"]);
        assert!(arrivals(&e).is_empty());
        let e = event(
            EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Any)),
            &["/w/a.csv"],
        );
        assert!(arrivals(&e).is_empty());
    }

    #[test]
    fn renames_into_the_folder_count() {
        let e = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/w/a.tmp", "/w/a.csv"],
        );
        assert_eq!(arrivals(&e), vec![PathBuf::from("/w/a.csv")]);
        let e = event(EventKind::Modify(ModifyKind::Name(RenameMode::From)), &["/w/a.csv"]);
        assert!(arrivals(&e).is_empty());
    }
}
