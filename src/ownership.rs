//! Destination ownership and conflict detection
//!
//! Proves that no two configured mappings, across every tracked source, ever
//! write overlapping output. Mappings are grouped by effective destination
//! (position-stripped, auto-named); any destination shared by two or more
//! owners is, by definition, a reported conflict, as is any pair where one
//! destination is an ancestor directory of the other.
//!
//! Conflicts are advisory. Sync proceeds regardless and the last-synced
//! owner overwrites; whether a conflict is fatal is the caller's policy.

use serde::Serialize;

use crate::config::PathMapping;

/// One configured mapping together with the source that owns it.
/// Transient - rebuilt on every validation run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOwner {
    pub source: String,
    pub mapping: PathMapping,
}

/// One side of a reported conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictOwner {
    pub source: String,
    pub from: String,
}

/// Two mappings that would write overlapping output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathConflict {
    /// The overlapped destination. For an ancestor/descendant pair this is
    /// the descendant - the concrete path both mappings would touch.
    pub path: String,
    pub first: ConflictOwner,
    pub second: ConflictOwner,
}

/// Evaluate every pair of mappings for ownership conflicts.
///
/// Never fails: empty input yields an empty list, and a mapping whose paths
/// are malformed is skipped here (the parse error surfaces where the mapping
/// is actually used). Pairs are symmetric and reported once, in input order,
/// so n owners of one destination yield exactly n*(n-1)/2 records.
pub fn detect_conflicts(owners: &[MappingOwner]) -> Vec<PathConflict> {
    // Arena of effective destinations: each one gets a stable small id in
    // first-seen order, owners live in an id-indexed vector. Keeps the
    // pairwise fan-out deterministic.
    let mut dests: Vec<String> = Vec::new();
    let mut owners_by_dest: Vec<Vec<usize>> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for (i, owner) in owners.iter().enumerate() {
        let Ok(dest) = owner.mapping.effective_destination() else {
            continue;
        };
        let dest = normalize(&dest);
        if dest.is_empty() {
            continue;
        }
        let id = *index.entry(dest.clone()).or_insert_with(|| {
            dests.push(dest);
            owners_by_dest.push(Vec::new());
            dests.len() - 1
        });
        owners_by_dest[id].push(i);
    }

    let mut conflicts = Vec::new();

    // Same destination: every owner pair overlaps.
    for (id, members) in owners_by_dest.iter().enumerate() {
        for (a, &first) in members.iter().enumerate() {
            for &second in &members[a + 1..] {
                conflicts.push(conflict(&dests[id], &owners[first], &owners[second]));
            }
        }
    }

    // Ancestor directory: `lib` overlaps `lib/sub`, `lib1` does not
    // overlap `lib2`.
    for a in 0..dests.len() {
        for b in a + 1..dests.len() {
            let deeper = if is_ancestor(&dests[a], &dests[b]) {
                &dests[b]
            } else if is_ancestor(&dests[b], &dests[a]) {
                &dests[a]
            } else {
                continue;
            };
            for &first in &owners_by_dest[a] {
                for &second in &owners_by_dest[b] {
                    let (first, second) = if first <= second {
                        (first, second)
                    } else {
                        (second, first)
                    };
                    conflicts.push(conflict(deeper, &owners[first], &owners[second]));
                }
            }
        }
    }

    conflicts
}

fn conflict(path: &str, first: &MappingOwner, second: &MappingOwner) -> PathConflict {
    PathConflict {
        path: path.to_string(),
        first: ConflictOwner {
            source: first.source.clone(),
            from: first.mapping.from.clone(),
        },
        second: ConflictOwner {
            source: second.source.clone(),
            from: second.mapping.from.clone(),
        },
    }
}

/// Slash-normalize a destination for comparison.
fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}

/// Whether `ancestor` is a strict path-prefix directory of `path`.
fn is_ancestor(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}
