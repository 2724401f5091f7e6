//! File system watcher for live reload.
//!
//! Watches the directory containing the open document so that editors which
//! save by writing a temp file and renaming it over the original are still
//! noticed.

use crate::error::Result;
use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

pub struct FileWatcher {
    // Dropping the watcher stops the notify thread
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
    path: PathBuf,
    last_reload: Instant,
    debounce: Duration,
    /// A relevant change arrived inside the debounce window
    pending_reload: bool,
}

impl FileWatcher {
    /// Start watching `path`.
    pub fn new(path: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "watching for changes");

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            path: path.to_path_buf(),
            last_reload: Instant::now(),
            debounce: Duration::from_millis(100),
            pending_reload: false,
        })
    }

    /// Drain pending events. Returns true if the document should be reloaded.
    ///
    /// A change seen inside the debounce window is remembered and reported
    /// by the first call after the window closes.
    pub fn check_for_changes(&mut self) -> bool {
        self.poll(Instant::now())
    }

    fn poll(&mut self, now: Instant) -> bool {
        loop {
            match self.receiver.try_recv() {
                Ok(Ok(event)) => self.pending_reload |= self.is_relevant(&event),
                Ok(Err(e)) => tracing::warn!(error = %e, "watch error"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if !self.pending_reload || now.duration_since(self.last_reload) < self.debounce {
            return false;
        }
        self.pending_reload = false;
        self.last_reload = now;
        true
    }

    fn is_relevant(&self, event: &Event) -> bool {
        let file_name = self.path.file_name();
        let touches_file = event
            .paths
            .iter()
            .any(|p| p == &self.path || (file_name.is_some() && p.file_name() == file_name));

        touches_file
            && matches!(
                event.kind,
                EventKind::Modify(ModifyKind::Data(_))
                    | EventKind::Modify(ModifyKind::Name(_))
                    | EventKind::Modify(ModifyKind::Any)
                    | EventKind::Access(AccessKind::Close(AccessMode::Write))
                    | EventKind::Create(_)
            )
    }
}
