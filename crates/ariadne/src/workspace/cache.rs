//! Process-lifetime memo of loaded workspaces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use super::Workspace;
use crate::error::{Error, Result};

/// Loaded workspaces keyed by canonical absolute path.
///
/// Lookups take a read lock only. A miss takes the load mutex, checks the
/// map again (another caller may have finished the same load meanwhile),
/// loads, and installs. Concurrent first queries for one path therefore
/// load it exactly once.
///
/// The cache is an ordinary value: construct one and pass it to each query.
/// Independent caches never share workspaces.
#[derive(Debug, Default)]
pub struct WorkspaceCache {
    entries: RwLock<HashMap<PathBuf, Arc<Workspace>>>,
    load_lock: Mutex<()>,
    loads: AtomicUsize,
}

impl WorkspaceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The workspace at `path`, loading it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Workspace`] if the path can't be canonicalized and
    /// propagates any load failure. Failed loads are not cached.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Workspace>> {
        self.get_or_load_with(path, Workspace::load)
    }

    /// Like [`WorkspaceCache::get_or_load`] with a custom loader.
    ///
    /// # Errors
    ///
    /// Propagates canonicalization and loader failures.
    pub fn get_or_load_with<F>(&self, path: &Path, load: F) -> Result<Arc<Workspace>>
    where
        F: FnOnce(&Path) -> Result<Workspace>,
    {
        let key = path.canonicalize().map_err(|e| Error::Workspace {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(hit) = self.lookup(&key) {
            return Ok(hit);
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = self.lookup(&key) {
            debug!(path = %key.display(), "Workspace loaded while waiting");
            return Ok(hit);
        }

        let workspace = Arc::new(load(&key)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&workspace));
        Ok(workspace)
    }

    fn lookup(&self, key: &Path) -> Option<Arc<Workspace>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of loads performed, hits excluded.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of cached workspaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn project_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::write(dir.path().join("App.csproj"), "<Project />").expect("should write");
        std::fs::write(dir.path().join("Program.cs"), "class Program { }").expect("should write");
        dir
    }

    #[test]
    fn second_access_reuses_workspace() {
        let dir = project_dir();
        let cache = WorkspaceCache::new();

        let first = cache.get_or_load(dir.path()).expect("should load");
        let second = cache.get_or_load(dir.path()).expect("should hit cache");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_first_access_loads_once() {
        let dir = project_dir();
        let cache = WorkspaceCache::new();

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| cache.get_or_load(dir.path()).expect("should load"));
            }
        });

        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn independent_caches_do_not_share() {
        let dir = project_dir();
        let a = WorkspaceCache::new();
        let b = WorkspaceCache::new();

        let from_a = a.get_or_load(dir.path()).expect("should load");
        let from_b = b.get_or_load(dir.path()).expect("should load");

        assert!(!Arc::ptr_eq(&from_a, &from_b));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = project_dir();
        let cache = WorkspaceCache::new();

        let failed = cache.get_or_load_with(dir.path(), |p| {
            Err(Error::Workspace {
                path: p.to_path_buf(),
                message: "boom".to_string(),
            })
        });

        assert!(failed.is_err());
        assert!(cache.is_empty());
        assert!(cache.get_or_load(dir.path()).is_ok());
    }

    #[test]
    fn missing_path_is_workspace_error() {
        let cache = WorkspaceCache::new();

        let err = cache
            .get_or_load(Path::new("/definitely/not/here.sln"))
            .expect_err("missing path should fail");

        assert!(matches!(err, Error::Workspace { .. }));
    }
}
