//! Lockfile entity and TOML persistence
//!
//! `vendo.lock` records, per tracked source, the resolved commit, a
//! destination-path -> hash map for whole-file mappings, and a list of
//! position locks for positional mappings. It is what makes vendoring
//! reproducible and verifiable.
//!
//! The schema version is `major.minor`: an unrecognized major aborts the
//! load rather than silently reinterpreting fields; a newer minor within a
//! known major loads fine.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PathMapping;
use crate::hash::ContentHash;

/// Default lockfile name at the project root.
pub const LOCKFILE_NAME: &str = "vendo.lock";

/// Schema major version this build reads and writes.
pub const SUPPORTED_MAJOR: u32 = 1;

const CURRENT_VERSION: &str = "1.0";

/// Result type for lockfile operations
pub type LockfileResult<T> = Result<T, LockfileError>;

/// Lockfile persistence errors
#[derive(Error, Debug)]
pub enum LockfileError {
    #[error("lockfile IO error: {0}")]
    Io(String),

    #[error("invalid lockfile format: {0}")]
    Parse(String),

    /// Unknown major version. Abort rather than guess at field meanings.
    #[error(
        "lockfile format incompatible: found version {found}, this vendo supports major {supported} - upgrade vendo or re-sync"
    )]
    UnsupportedVersion { found: String, supported: u32 },
}

/// Lock entry for one positional mapping.
///
/// Created on first sync, overwritten on every re-sync, removed when the
/// mapping is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLock {
    pub from: String,
    pub to: String,
    pub source_hash: String,
}

/// Locked state of one tracked source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLock {
    /// Resolved commit the last sync vendored from.
    pub commit: String,
    pub synced_at: DateTime<Utc>,
    /// Destination path -> content hash, whole-file mappings only.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub positions: Vec<PositionLock>,
}

impl SourceLock {
    pub fn new(commit: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            synced_at: Utc::now(),
            files: BTreeMap::new(),
            positions: Vec::new(),
        }
    }

    /// Record the hash a sync computed for `mapping`. Positional mappings go
    /// to the position list (keyed by from+to), whole-file mappings to the
    /// destination map.
    pub fn record(&mut self, mapping: &PathMapping, dest: &str, hash: &ContentHash) {
        if mapping.is_positional() || is_positional_to(mapping) {
            let entry = PositionLock {
                from: mapping.from.clone(),
                to: mapping.to.clone(),
                source_hash: hash.as_str().to_string(),
            };
            match self
                .positions
                .iter_mut()
                .find(|p| p.from == mapping.from && p.to == mapping.to)
            {
                Some(existing) => *existing = entry,
                None => self.positions.push(entry),
            }
        } else {
            self.files.insert(dest.to_string(), hash.as_str().to_string());
        }
    }

    /// Previously recorded hash for `mapping`, if any.
    pub fn hash_for(&self, mapping: &PathMapping, dest: &str) -> Option<ContentHash> {
        if mapping.is_positional() || is_positional_to(mapping) {
            self.positions
                .iter()
                .find(|p| p.from == mapping.from && p.to == mapping.to)
                .map(|p| ContentHash::parse(&p.source_hash))
        } else {
            self.files.get(dest).map(|h| ContentHash::parse(h))
        }
    }

    /// Drop the lock entry for a removed mapping.
    pub fn remove(&mut self, mapping: &PathMapping, dest: &str) {
        self.positions
            .retain(|p| !(p.from == mapping.from && p.to == mapping.to));
        self.files.remove(dest);
    }
}

fn is_positional_to(mapping: &PathMapping) -> bool {
    !matches!(
        crate::position::parse_path_position(&mapping.to),
        Ok((_, None))
    )
}

/// The lockfile: per-source locked state plus a schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lockfile {
    version: String,
    sources: BTreeMap<String, SourceLock>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockfile {
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            sources: BTreeMap::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source(&self, name: &str) -> Option<&SourceLock> {
        self.sources.get(name)
    }

    pub fn source_mut(&mut self, name: &str) -> Option<&mut SourceLock> {
        self.sources.get_mut(name)
    }

    pub fn set_source(&mut self, name: impl Into<String>, lock: SourceLock) {
        self.sources.insert(name.into(), lock);
    }

    pub fn remove_source(&mut self, name: &str) -> Option<SourceLock> {
        self.sources.remove(name)
    }

    pub fn sources(&self) -> impl Iterator<Item = (&str, &SourceLock)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// TOML representation of the lockfile on disk.
#[derive(Debug, Serialize, Deserialize)]
struct TomlLockfile {
    version: String,
    #[serde(default)]
    sources: BTreeMap<String, SourceLock>,
}

/// TOML-based lockfile repository.
///
/// Loading a missing file yields an empty lockfile. Saving takes an
/// exclusive advisory lock on a sibling `.vendo.lock.guard` file, since many
/// concurrent drift evaluations may merge into one lockfile write.
#[derive(Debug, Default)]
pub struct TomlLockfileRepository;

impl TomlLockfileRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: &Path) -> LockfileResult<Lockfile> {
        if !path.exists() {
            return Ok(Lockfile::new());
        }

        let content = fs::read_to_string(path).map_err(|e| LockfileError::Io(e.to_string()))?;
        let parsed: TomlLockfile =
            toml::from_str(&content).map_err(|e| LockfileError::Parse(e.to_string()))?;

        let major = parse_major(&parsed.version)?;
        if major != SUPPORTED_MAJOR {
            return Err(LockfileError::UnsupportedVersion {
                found: parsed.version,
                supported: SUPPORTED_MAJOR,
            });
        }

        Ok(Lockfile {
            version: parsed.version,
            sources: parsed.sources,
        })
    }

    pub fn save(&self, lockfile: &Lockfile, path: &Path) -> LockfileResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| LockfileError::Io(e.to_string()))?;
            }
        }

        let guard_path = guard_path(path);
        let guard =
            fs::File::create(&guard_path).map_err(|e| LockfileError::Io(e.to_string()))?;
        guard
            .lock_exclusive()
            .map_err(|e| LockfileError::Io(e.to_string()))?;

        let doc = TomlLockfile {
            version: lockfile.version.clone(),
            sources: lockfile.sources.clone(),
        };
        let content =
            toml::to_string_pretty(&doc).map_err(|e| LockfileError::Parse(e.to_string()))?;
        let result = fs::write(path, content).map_err(|e| LockfileError::Io(e.to_string()));

        let _ = fs2::FileExt::unlock(&guard);
        drop(guard);
        // Best effort; a concurrent saver may have recreated it already.
        let _ = fs::remove_file(&guard_path);
        result
    }
}

fn guard_path(path: &Path) -> std::path::PathBuf {
    let mut name = std::ffi::OsString::from(".");
    if let Some(file) = path.file_name() {
        name.push(file);
    }
    name.push(".guard");
    path.with_file_name(name)
}

fn parse_major(version: &str) -> LockfileResult<u32> {
    let major = version.split('.').next().unwrap_or("");
    major
        .parse()
        .map_err(|_| LockfileError::Parse(format!("bad version string '{}'", version)))
}
