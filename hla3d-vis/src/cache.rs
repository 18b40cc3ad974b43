use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use fxhash::FxHashMap as HashMap;

use hla3d_structure::{Result, StructureRecord};

type CacheKey = (PathBuf, Option<SystemTime>);

///
/// Parsed structures of a single request, keyed by path and modification time.
///
/// A heterodimer file serves both of its alleles, so it is parsed once per request.
/// The cache is meant to be dropped with the request.
///
#[derive(Debug, Default)]
pub struct StructureCache {
    records: HashMap<CacheKey, Arc<StructureRecord>>,
}

impl StructureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_or_parse(&mut self, path: &Path) -> Result<Arc<StructureRecord>> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
        let key = (path.to_path_buf(), modified);

        if let Some(record) = self.records.get(&key) {
            log::debug!("Reusing parsed structure {}", path.display());
            return Ok(Arc::clone(record));
        }

        let record = Arc::new(StructureRecord::try_from(path)?);
        self.records.insert(key, Arc::clone(&record));
        Ok(record)
    }
}
