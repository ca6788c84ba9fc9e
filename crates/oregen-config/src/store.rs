use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::ConfigError;
use crate::parse::Skipped;
use crate::vote::{VoteConfig, load_from_path};

/// Publishes immutable `VoteConfig` snapshots. Readers keep the `Arc` they
/// took for the whole generation pass; a reload swaps in a new one.
pub struct ConfigStore {
    current: RwLock<Arc<VoteConfig>>,
    rev: AtomicU64,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(VoteConfig::default())
    }
}

impl ConfigStore {
    pub fn new(cfg: VoteConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(cfg)),
            rev: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> Arc<VoteConfig> {
        self.current().1
    }

    /// Snapshot together with the revision it was published under.
    pub fn current(&self) -> (u64, Arc<VoteConfig>) {
        let guard = match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        (self.rev.load(Ordering::Acquire), Arc::clone(&*guard))
    }

    /// Number of snapshots published since construction.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.rev.load(Ordering::Acquire)
    }

    pub fn publish(&self, cfg: VoteConfig) -> u64 {
        let next = Arc::new(cfg);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
        // Bumped while the write lock is held; `current()` relies on this.
        self.rev.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Reloads from `path`. On failure the current snapshot stays in place.
    pub fn reload_from_path(&self, path: &Path) -> Result<Vec<Skipped>, ConfigError> {
        let parsed = load_from_path(path)?;
        let rev = self.publish(parsed.value);
        log::info!("ore config revision {} published from {}", rev, path.display());
        Ok(parsed.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenerationSettings;
    use std::io::Write;

    #[test]
    fn held_snapshot_survives_publish() {
        let store = ConfigStore::default();
        let before = store.snapshot();
        assert!(before.is_empty());
        let rev = store.publish(VoteConfig::default().with_generator(GenerationSettings::new("copper")));
        assert_eq!(rev, 1);
        assert!(before.is_empty());
        let after = store.snapshot();
        assert_eq!(after.active().collect::<Vec<_>>(), vec!["copper"]);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.current().0, 1);
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let store = ConfigStore::new(VoteConfig::default().with_generator(GenerationSettings::new("tin")));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "ores = [").unwrap();
        assert!(store.reload_from_path(file.path()).is_err());
        assert_eq!(store.snapshot().active().collect::<Vec<_>>(), vec!["tin"]);
        assert_eq!(store.revision(), 0);

        let missing = file.path().with_extension("missing");
        assert!(matches!(store.reload_from_path(&missing), Err(ConfigError::Read(_))));
    }

    #[test]
    fn reload_reports_skipped_entries() {
        let store = ConfigStore::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ores = [\"copper\", 7]").unwrap();
        let skipped = store.reload_from_path(file.path()).unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, "ores[1]");
        assert!(store.snapshot().ores.contains("copper"));
    }
}
