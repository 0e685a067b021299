use crate::error::{Result, StorageError};
use crate::storage::KeyValueStorage;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Persistent key-value surface backed by a single JSON file.
///
/// The whole map is re-read on every `get` and rewritten on every `set`,
/// so there is no in-process cache to drift from the file. The file holds
/// a handful of short string entries, which keeps the full round trip
/// cheap.
pub struct FileStorage {
    path: PathBuf,
}

/// Outcome of reading the backing file.
///
/// Distinguishes a file that parsed (possibly empty) from one that exists
/// but is corrupt, so writers can quarantine before overwriting.
struct MapLoad {
    map: BTreeMap<String, String>,
    corrupt: bool,
}

impl FileStorage {
    /// Opens a storage file, creating its parent directory if needed.
    ///
    /// The file itself is not created until the first `set`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir).map_err(|e| StorageError::dir_creation(dir.to_path_buf(), e))?;
        }

        Ok(Self { path })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current map from disk.
    ///
    /// Returns:
    /// - a parsed map if the file exists and is valid JSON
    /// - an empty map if the file doesn't exist yet
    /// - an empty map with `corrupt: true` if the file exists but doesn't parse
    fn read_map(&self) -> Result<MapLoad> {
        if !self.path.exists() {
            return Ok(MapLoad {
                map: BTreeMap::new(),
                corrupt: false,
            });
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::file_read(self.path.clone(), e))?;

        match serde_json::from_str(&contents) {
            Ok(map) => Ok(MapLoad {
                map,
                corrupt: false,
            }),
            Err(e) => {
                warn!("Storage file corrupted at {:?}: {e}", self.path);
                Ok(MapLoad {
                    map: BTreeMap::new(),
                    corrupt: true,
                })
            }
        }
    }

    /// Writes the map using the atomic write pattern.
    ///
    /// 1. Writes to temp file
    /// 2. Syncs to disk (fsync)
    /// 3. Atomic rename to final location
    ///
    /// This prevents corruption if the process crashes mid-write.
    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        // Serialize with pretty printing for debuggability
        let json = serde_json::to_string_pretty(map)?;

        let temp_path = self.sibling(&format!("tmp.{}", std::process::id()));

        // Write to temp file with explicit sync
        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| StorageError::file_write(temp_path.clone(), e))?;

            file.write_all(json.as_bytes())
                .map_err(|e| StorageError::file_write(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| StorageError::file_write(temp_path.clone(), e))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(|e| {
            // Clean up temp file on failure
            let _ = fs::remove_file(&temp_path);
            StorageError::atomic_rename(temp_path, self.path.clone(), e)
        })?;

        Ok(())
    }

    /// Moves an unparseable storage file aside for debugging.
    ///
    /// Renames `<file>` to `<file>.corrupted.{timestamp}` so the bad
    /// contents stay available for inspection instead of being silently
    /// overwritten by the next write.
    fn quarantine(&self) {
        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let backup_path = self.sibling(&format!("corrupted.{timestamp}"));

        match fs::rename(&self.path, &backup_path) {
            Ok(()) => warn!("Backed up corrupted storage file to {backup_path:?}"),
            Err(e) => warn!(
                "Failed to back up corrupted storage file at {:?}: {e}",
                self.path
            ),
        }
    }

    /// Sibling path `<file>.<suffix>` in the same directory.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.path.with_file_name(format!("{name}.{suffix}"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        // Corrupt files are already logged by read_map; readers treat them
        // as empty and leave quarantining to the next write.
        let load = self.read_map()?;
        Ok(load.map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let load = self.read_map()?;

        if load.corrupt {
            self.quarantine();
        }

        let mut map = load.map;
        map.insert(key.to_string(), value.to_string());

        self.write_map(&map)
    }
}
