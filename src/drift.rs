//! Drift classification and verification
//!
//! For each mapping the engine tracks two independent classifications:
//! local drift (current extracted content vs. the hash recorded at last
//! sync) and upstream drift (the same extraction vs. a freshly resolved
//! remote version, when available). Conflict risk is flagged exactly when
//! both are simultaneously non-unchanged for the same region - the signal
//! that a blind overwrite would silently discard local edits.
//!
//! Verification always goes through the extractor, so the hash compared is
//! computed over the exact byte range the mapping defines. Hashing the whole
//! current file for a positional mapping would produce false "modified"
//! results for unrelated edits elsewhere in the file.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::config::PathMapping;
use crate::error::{VendoError, VendoResult};
use crate::extract::{extract, normalize_line_endings};
use crate::hash::ContentHash;
use crate::position::{parse_path_position, PositionSpec};

/// Classification of one side (local or upstream) of a vendored region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Unchanged,
    Modified,
    Added,
    Deleted,
}

/// Upstream content for a verification pass.
#[derive(Debug, Clone, Copy)]
pub enum Upstream<'a> {
    /// No upstream resolution was attempted (offline). Never contributes
    /// to conflict risk.
    NotEvaluated,
    /// Upstream was resolved and the file is gone.
    Missing,
    /// Upstream was resolved to these file bytes.
    Present(&'a [u8]),
}

/// Per-file drift classification. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftFile {
    /// Effective destination path of the mapping.
    pub path: String,
    pub local: FileStatus,
    /// `None` when upstream was not evaluated.
    pub upstream: Option<FileStatus>,
    /// Line counts vs. upstream; only populated for whole-file mappings.
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl DriftFile {
    /// True when the region changed both locally and upstream.
    pub fn conflict_risk(&self) -> bool {
        self.local != FileStatus::Unchanged
            && matches!(self.upstream, Some(s) if s != FileStatus::Unchanged)
    }

    pub fn is_changed(&self) -> bool {
        self.local != FileStatus::Unchanged
            || matches!(self.upstream, Some(s) if s != FileStatus::Unchanged)
    }
}

/// Aggregated counts for one dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriftStats {
    pub total_files: usize,
    pub changed_files: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl DriftStats {
    /// Drift score in 0..=100: the fraction of changed files.
    pub fn score(&self) -> u8 {
        if self.total_files == 0 {
            return 0;
        }
        ((self.changed_files * 100) / self.total_files) as u8
    }
}

/// Drift report for one tracked source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDrift {
    pub name: String,
    pub files: Vec<DriftFile>,
    pub stats: DriftStats,
}

impl DependencyDrift {
    pub fn has_conflict_risk(&self) -> bool {
        self.files.iter().any(DriftFile::conflict_risk)
    }
}

/// Classify one mapping against its locked hash.
///
/// `current` is the destination file as it exists locally (`None` if it was
/// deleted); the mapping's `to` position selects the region to hash.
/// Upstream bytes are addressed by the `from` position. Parse and extraction
/// errors surface to the caller; classification itself never fails on
/// well-formed input.
pub fn verify(
    mapping: &PathMapping,
    locked_hash: Option<&ContentHash>,
    current: Option<&[u8]>,
    upstream: Upstream<'_>,
) -> VendoResult<DriftFile> {
    let (_, to_spec) = parse_path_position(&mapping.to)?;
    let (_, from_spec) = parse_path_position(&mapping.from)?;

    let local = match (current, locked_hash) {
        (None, None) => FileStatus::Unchanged,
        (None, Some(_)) => FileStatus::Deleted,
        (Some(_), None) => FileStatus::Added,
        (Some(bytes), Some(locked)) => region_status(bytes, to_spec.as_ref(), locked)?,
    };

    let upstream_status = match (upstream, locked_hash) {
        (Upstream::NotEvaluated, _) => None,
        (Upstream::Missing, Some(_)) => Some(FileStatus::Deleted),
        (Upstream::Missing, None) => Some(FileStatus::Unchanged),
        (Upstream::Present(_), None) => Some(FileStatus::Added),
        (Upstream::Present(bytes), Some(locked)) => {
            Some(region_status(bytes, from_spec.as_ref(), locked)?)
        }
    };

    // Line-diff stats are meaningful only for full-file comparison;
    // positional entries contribute hash equality alone.
    let (lines_added, lines_removed) = match (to_spec, from_spec, current, upstream) {
        (None, None, Some(cur), Upstream::Present(up)) => line_stats(cur, up),
        _ => (0, 0),
    };

    Ok(DriftFile {
        path: mapping.effective_destination()?,
        local,
        upstream: upstream_status,
        lines_added,
        lines_removed,
    })
}

/// Roll per-file classifications up into a dependency-level report.
pub fn aggregate(name: impl Into<String>, files: Vec<DriftFile>) -> DependencyDrift {
    let mut stats = DriftStats {
        total_files: files.len(),
        ..DriftStats::default()
    };
    for file in &files {
        if file.is_changed() {
            stats.changed_files += 1;
        }
        stats.lines_added += file.lines_added;
        stats.lines_removed += file.lines_removed;
    }
    DependencyDrift {
        name: name.into(),
        files,
        stats,
    }
}

/// Compare the region a spec addresses against the locked hash.
///
/// A file whose content no longer reaches the locked region (truncated below
/// the start line) is drift, not an error: classification stays total over
/// well-formed mappings.
fn region_status(
    bytes: &[u8],
    spec: Option<&PositionSpec>,
    locked: &ContentHash,
) -> VendoResult<FileStatus> {
    let region = match extract(bytes, spec) {
        Ok(region) => region,
        Err(VendoError::LineOutOfRange { .. }) => return Ok(FileStatus::Modified),
        Err(e) => return Err(e),
    };
    Ok(if locked.matches_bytes(&region) {
        FileStatus::Unchanged
    } else {
        FileStatus::Modified
    })
}

/// Added/removed line counts between local and upstream content, compared
/// after line-ending normalization like the hash path.
fn line_stats(current: &[u8], upstream: &[u8]) -> (usize, usize) {
    let current = normalize_line_endings(current);
    let upstream = normalize_line_endings(upstream);
    let old = String::from_utf8_lossy(&current);
    let new = String::from_utf8_lossy(&upstream);
    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());

    let mut added = 0;
    let mut removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, removed)
}
