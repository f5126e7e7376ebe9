//! Per-source verification orchestration
//!
//! Pure functions over in-memory values: the caller (CLI, or a concurrent
//! orchestrator) gathers file bytes however it likes, then each source is
//! evaluated independently against its own lock entry. Lockfile writes are
//! the caller's to serialize.

use crate::config::PathMapping;
use crate::drift::{aggregate, verify, DependencyDrift, Upstream};
use crate::error::VendoResult;
use crate::extract::extract;
use crate::hash::ContentHash;
use crate::lockfile::SourceLock;
use crate::position::parse_path_position;

/// Gathered content for one mapping, ready for verification.
pub struct MappingContent<'a> {
    pub mapping: &'a PathMapping,
    /// Local destination file bytes; `None` if the file is gone.
    pub current: Option<&'a [u8]>,
    pub upstream: Upstream<'a>,
}

/// Classify every mapping of one source against its lock entry.
pub fn verify_source(
    name: &str,
    lock: Option<&SourceLock>,
    entries: &[MappingContent<'_>],
) -> VendoResult<DependencyDrift> {
    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let dest = entry.mapping.effective_destination()?;
        let locked = lock.and_then(|l| l.hash_for(entry.mapping, &dest));
        files.push(verify(
            entry.mapping,
            locked.as_ref(),
            entry.current,
            entry.upstream,
        )?);
    }
    Ok(aggregate(name, files))
}

/// What a sync of `mapping` over `source_bytes` would produce: the effective
/// destination, the exact bytes to write, and the hash to lock.
///
/// The hash is computed over the extracted bytes, so a later verify of the
/// untouched destination classifies it unchanged.
pub fn extract_for_sync(
    mapping: &PathMapping,
    source_bytes: &[u8],
) -> VendoResult<(String, Vec<u8>, ContentHash)> {
    let (_, from_spec) = parse_path_position(&mapping.from)?;
    let bytes = extract(source_bytes, from_spec.as_ref())?;
    let hash = ContentHash::from_bytes(&bytes);
    Ok((mapping.effective_destination()?, bytes, hash))
}

/// Run the extraction for `mapping` and record the result in `lock`.
/// Returns the destination and bytes for the caller to write.
pub fn sync_mapping(
    lock: &mut SourceLock,
    mapping: &PathMapping,
    source_bytes: &[u8],
) -> VendoResult<(String, Vec<u8>)> {
    let (dest, bytes, hash) = extract_for_sync(mapping, source_bytes)?;
    lock.record(mapping, &dest, &hash);
    Ok((dest, bytes))
}
