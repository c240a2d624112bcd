//! Score store backends
//!
//! The store is a flat namespace of small JSON resources addressed by
//! `dir/name` paths. It only ever grows: resources are created once and never
//! rewritten, so concurrent writers need no locking as long as names differ.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use super::error::LeaderboardError;

/// List/read/create access to stored resources
pub trait ScoreStore: Send + Sync {
    /// Paths of the resources directly inside `dir` (empty if `dir` is absent)
    fn list(&self, dir: &str) -> Result<Vec<String>, LeaderboardError>;

    /// Raw contents of a resource
    fn read(&self, path: &str) -> Result<String, LeaderboardError>;

    /// Create a new resource; fails if `path` already exists
    fn create(&self, path: &str, contents: &str) -> Result<(), LeaderboardError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, LeaderboardError> {
        self.resources
            .lock()
            .map_err(|_| LeaderboardError::Transport("memory store lock poisoned".into()))
    }

    /// Number of stored resources
    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreStore for MemoryStore {
    fn list(&self, dir: &str) -> Result<Vec<String>, LeaderboardError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let resources = self.lock()?;
        Ok(resources
            .keys()
            .filter(|path| {
                path.strip_prefix(&prefix)
                    .is_some_and(|name| !name.is_empty() && !name.contains('/'))
            })
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, LeaderboardError> {
        self.lock()?
            .get(path)
            .cloned()
            .ok_or_else(|| LeaderboardError::Transport(format!("{path}: not found")))
    }

    fn create(&self, path: &str, contents: &str) -> Result<(), LeaderboardError> {
        let mut resources = self.lock()?;
        if resources.contains_key(path) {
            return Err(LeaderboardError::Transport(format!("{path}: already exists")));
        }
        resources.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}

/// Directory on disk, one file per resource (typically a git working tree)
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn io_error(path: &str, err: std::io::Error) -> LeaderboardError {
        LeaderboardError::Transport(format!("{path}: {err}"))
    }
}

impl ScoreStore for DirStore {
    fn list(&self, dir: &str) -> Result<Vec<String>, LeaderboardError> {
        let read_dir = match fs::read_dir(self.root.join(dir)) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_error(dir, e)),
        };

        let mut paths = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| Self::io_error(dir, e))?;
            if !item.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(name) = item.file_name().to_str() {
                paths.push(format!("{}/{}", dir.trim_end_matches('/'), name));
            }
        }
        // Directory order is platform-dependent; names start with the timestamp.
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String, LeaderboardError> {
        fs::read_to_string(self.root.join(path)).map_err(|e| Self::io_error(path, e))
    }

    fn create(&self, path: &str, contents: &str) -> Result<(), LeaderboardError> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(path, e))?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .map_err(|e| Self::io_error(path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| Self::io_error(path, e))
    }
}
