//! Dataset cache keyed by source path.

use super::dataset::Dataset;
use super::loader::{DataLoader, LoaderError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Memoizes [`DataLoader::load`] per path until explicitly invalidated.
///
/// Cached datasets are shared read-only; a failed load is never cached.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoaderError> {
        if let Some(dataset) = self.entries.get(path) {
            debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(DataLoader::load(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the cached dataset for `path`; returns whether one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Forget every cached dataset; returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}

#[cfg(test)]
impl DatasetCache {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FrameView;

    fn write(path: &Path, body: &str) {
        std::fs::write(path, body).unwrap();
    }

    #[test]
    fn test_reuses_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        write(&path, "order_id,final_amount\nA,1\n");

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();
        assert_eq!(first.height(), 1);

        write(&path, "order_id,final_amount\nA,1\nB,2\n");
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.height(), 1);

        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        let reloaded = cache.get_or_load(&path).unwrap();
        assert_eq!(reloaded.height(), 2);
        assert_eq!(first.height(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");

        let mut cache = DatasetCache::new();
        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_empty());

        write(&path, "order_id\nA\n");
        assert!(cache.get_or_load(&path).is_ok());
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }
}
