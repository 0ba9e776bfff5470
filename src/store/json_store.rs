use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// Collection-per-file JSON persistence. Each entity collection is stored
/// wholesale as `<data_dir>/<collection>.json` and rewritten after every
/// mutation; a missing file reads back as an empty collection.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }

    pub fn load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overwrites the collection file. Written to a sibling temp file first so
    /// a crash mid-write cannot leave a truncated collection behind.
    pub fn save<T: Serialize>(&self, collection: &str, items: &[T]) -> Result<()> {
        let path = self.collection_path(collection);
        let tmp = self.dir.join(format!("{}.json.tmp", collection));
        let content = serde_json::to_string_pretty(items)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
