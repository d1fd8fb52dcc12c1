use crate::error::DataLoadError;
use crate::load::load_raw_table;
use crate::normalize::{normalize, CaseTable};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, info};

/// Normalized tables keyed by `(source path, sheet)`.
///
/// A table is built on first request and handed out as a shared `Arc` afterwards.
/// Nothing is evicted; failed loads are not remembered.
#[derive(Default)]
pub struct DatasetCache {
    tables: Mutex<HashMap<(PathBuf, String), Arc<CaseTable>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(&self, path: P, sheet: &str) -> Result<Arc<CaseTable>, DataLoadError> {
        let key = (path.as_ref().to_path_buf(), sheet.to_string());
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(table) = tables.get(&key) {
            debug!(path = %key.0.display(), sheet, "case table cache hit");
            return Ok(Arc::clone(table));
        }

        info!(path = %key.0.display(), sheet, "loading case table");
        let table = Arc::new(normalize(load_raw_table(&key.0, sheet)?)?);
        tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static GLOBAL_CACHE: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

/// Load through the process-wide cache.
pub fn load_cases<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Arc<CaseTable>, DataLoadError> {
    GLOBAL_CACHE.load(path, sheet)
}
