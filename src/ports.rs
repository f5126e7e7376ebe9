//! Collaborator ports
//!
//! The core stays pure and synchronous; anything that touches the network
//! lives behind [`Transport`]. Ref resolution, cloning, and authentication
//! are the transport's problem, never this crate's.

use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-layer failures
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("ref '{git_ref}' could not be resolved in {repo}")]
    UnresolvedRef { repo: String, git_ref: String },
}

/// Supplies raw file bytes at a given ref/path and resolves the latest
/// commit for upstream-drift comparison.
pub trait Transport {
    /// Resolve `git_ref` in `repo` to a concrete commit id.
    fn resolve_latest(&self, repo: &str, git_ref: &str) -> TransportResult<String>;

    /// Fetch file bytes at `commit`. `Ok(None)` means the file does not
    /// exist at that commit.
    fn fetch_file(&self, repo: &str, commit: &str, path: &str) -> TransportResult<Option<Vec<u8>>>;
}
