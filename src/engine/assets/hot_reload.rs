// Hot reloading of asset source files during development

use super::{AssetError, AssetId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Minimum time between two scans of the watched files
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct WatchedFile {
    modified: SystemTime,
    owners: Vec<AssetId>,
}

/// Tracks source file modification times and reports which assets went stale
pub struct HotReloadWatcher {
    files: HashMap<PathBuf, WatchedFile>,
    enabled: bool,
    poll_interval: Duration,
    last_poll: Option<Instant>,
}

impl HotReloadWatcher {
    pub fn new(enabled: bool) -> Self {
        Self {
            files: HashMap::new(),
            enabled,
            poll_interval: DEFAULT_POLL_INTERVAL,
            last_poll: None,
        }
    }

    #[cfg(test)]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Register `path` as a source of asset `owner`
    pub fn watch_file<P: AsRef<Path>>(&mut self, path: P, owner: AssetId) -> Result<(), AssetError> {
        if !self.enabled {
            return Ok(());
        }

        let path = path.as_ref();
        let modified = Self::modification_time(path)?;
        let entry = self
            .files
            .entry(path.to_path_buf())
            .or_insert_with(|| WatchedFile {
                modified,
                owners: Vec::new(),
            });
        if !entry.owners.contains(&owner) {
            entry.owners.push(owner);
        }

        Ok(())
    }

    /// Scan all watched files, at most once per poll interval
    ///
    /// Returns the assets whose source files changed since the last scan.
    pub fn poll(&mut self) -> Vec<AssetId> {
        if !self.enabled {
            return Vec::new();
        }

        let now = Instant::now();
        if let Some(last) = self.last_poll {
            if now.duration_since(last) < self.poll_interval {
                return Vec::new();
            }
        }
        self.last_poll = Some(now);

        self.check_all()
    }

    /// Scan all watched files immediately
    pub fn check_all(&mut self) -> Vec<AssetId> {
        let mut stale = Vec::new();

        for (path, watched) in self.files.iter_mut() {
            // A file that vanished mid-save is picked up on a later scan
            let Ok(current) = Self::modification_time(path) else {
                continue;
            };
            if current > watched.modified {
                watched.modified = current;
                for owner in &watched.owners {
                    if !stale.contains(owner) {
                        stale.push(*owner);
                    }
                }
            }
        }

        stale
    }

    #[cfg(test)]
    pub fn watched_count(&self) -> usize {
        self.files.len()
    }

    fn modification_time(path: &Path) -> Result<SystemTime, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }
        Ok(std::fs::metadata(path)?.modified()?)
    }
}
