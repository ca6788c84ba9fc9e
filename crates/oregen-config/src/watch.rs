use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::store::ConfigStore;

/// File watcher for the ore config. Dropping it stops watching.
pub struct ConfigWatcher {
    path: PathBuf,
    rx: Receiver<()>,
    _watcher: RecommendedWatcher,
}

pub fn watch_config(path: impl AsRef<Path>) -> Result<ConfigWatcher, notify::Error> {
    let path = path.as_ref().to_path_buf();
    let (tx, rx) = channel::<()>();
    let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res {
            match event.kind {
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => {
                    let _ = tx.send(());
                }
                _ => {}
            }
        }
    })?;
    watcher.watch(path.as_path(), RecursiveMode::NonRecursive)?;
    log::info!("watching ore config {}", path.display());
    Ok(ConfigWatcher {
        path,
        rx,
        _watcher: watcher,
    })
}

impl ConfigWatcher {
    /// Drains pending change notifications; true if there were any.
    pub fn take_changed(&self) -> bool {
        self.rx.try_iter().count() > 0
    }

    /// Blocks up to `timeout` for a change, then drains the burst that usually follows.
    pub fn wait_changed(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => {
                let _ = self.take_changed();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Reloads `store` if the file changed. Returns whether a new snapshot was published.
    pub fn process_events(&self, store: &ConfigStore) -> bool {
        if !self.take_changed() {
            return false;
        }
        self.reload(store)
    }

    pub fn reload(&self, store: &ConfigStore) -> bool {
        if !self.path.exists() {
            log::warn!("ore config missing: {}", self.path.display());
            return false;
        }
        match store.reload_from_path(&self.path) {
            Ok(_) => {
                log::info!("ore config reloaded; chunks already generated are unchanged");
                true
            }
            Err(e) => {
                log::warn!("ore config reload failed ({}): {}", self.path.display(), e);
                false
            }
        }
    }
}
