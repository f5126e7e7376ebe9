//! Vendo - declarative source vendoring with drift tracking
//!
//! Vendo copies files, directories, or byte-precise sub-ranges of files from
//! upstream repositories into a local project tree, and maintains a lockfile
//! recording exactly what was copied so later runs can tell whether vendored
//! content still matches what was locked, changed locally, or changed
//! upstream.
//!
//! The core is three tightly coupled mechanisms sharing one representation
//! (path + optional position) and one hashing discipline:
//!
//! - [`position`]: the `:L...` grammar addressing line/column sub-ranges
//! - [`ownership`]: proof that no two mappings write overlapping output
//! - [`drift`]: hash-based local/upstream drift classification

pub mod config;
pub mod drift;
pub mod error;
pub mod extract;
pub mod hash;
pub mod lockfile;
pub mod ownership;
pub mod ports;
pub mod position;
pub mod verify;

// Re-exports for convenience
pub use config::{ConfigWarning, PathMapping, Source, VendorConfig};
pub use drift::{aggregate, DependencyDrift, DriftFile, DriftStats, FileStatus, Upstream};
pub use error::{VendoError, VendoResult};
pub use extract::{extract, normalize_line_endings};
pub use hash::ContentHash;
pub use lockfile::{
    Lockfile, LockfileError, PositionLock, SourceLock, TomlLockfileRepository, LOCKFILE_NAME,
};
pub use ownership::{detect_conflicts, MappingOwner, PathConflict};
pub use position::{format_path_position, parse_path_position, strip_position, PositionSpec};
pub use verify::{extract_for_sync, sync_mapping, verify_source, MappingContent};
