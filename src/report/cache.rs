use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use super::{LoadError, load_report};
use crate::models::Report;

/// Reports kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 8;

struct CachedReport {
    modified: Option<SystemTime>,
    report: Arc<Report>,
    last_used: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<PathBuf, CachedReport>,
    clock: u64,
}

/// Read-through cache of loaded reports keyed by path.
///
/// An entry is reused while the file's modification time is unchanged. At
/// most `capacity` reports are held; the least recently used one goes
/// first. Files are read and parsed without the lock held.
pub struct ReportCache {
    entries: Mutex<Entries>,
    capacity: usize,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ReportCache {
            entries: Mutex::new(Entries::default()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Blocking: stats and possibly reads `path`.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Report>, LoadError> {
        let modified = match std::fs::metadata(path) {
            Ok(meta) => meta.modified().ok(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                self.lock().map.remove(path);
                return Err(LoadError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(LoadError::Io { path: path.to_path_buf(), source });
            }
        };

        {
            let mut entries = self.lock();
            entries.clock += 1;
            let now = entries.clock;
            if let Some(cached) = entries.map.get_mut(path) {
                if modified.is_some() && cached.modified == modified {
                    tracing::debug!("report cache hit for {}", path.display());
                    cached.last_used = now;
                    return Ok(Arc::clone(&cached.report));
                }
            }
        }

        let report = Arc::new(load_report(path)?);
        tracing::info!(
            "loaded {:?} report from {} ({} players, {} teams, {} events)",
            report.schema,
            path.display(),
            report.players().len(),
            report.teams().len(),
            report.events().len(),
        );

        let mut entries = self.lock();
        entries.clock += 1;
        let now = entries.clock;
        if !entries.map.contains_key(path) && entries.map.len() >= self.capacity {
            let oldest = entries
                .map
                .iter()
                .min_by_key(|(_, cached)| cached.last_used)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!("evicting cached report {}", oldest.display());
                entries.map.remove(&oldest);
            }
        }
        entries.map.insert(
            path.to_path_buf(),
            CachedReport { modified, report: Arc::clone(&report), last_used: now },
        );
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
