//! Content hash value object
//!
//! A SHA-256 digest over exactly the bytes the extractor returns, rendered
//! as `sha256:<hex>`. The same algorithm is applied at lock-write time and
//! at every later verify; comparing anything else would make drift detection
//! meaningless.

use std::fmt;

use sha2::{Digest, Sha256};

/// A `sha256:`-prefixed content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Prefix identifying the digest algorithm.
    pub const PREFIX: &'static str = "sha256:";

    /// Compute the hash of extracted content bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("{}{:x}", Self::PREFIX, Sha256::digest(bytes)))
    }

    /// Wrap an already-rendered hash string, adding the prefix if absent.
    pub fn parse(s: &str) -> Self {
        if s.starts_with(Self::PREFIX) {
            Self(s.to_string())
        } else {
            Self(format!("{}{}", Self::PREFIX, s))
        }
    }

    /// Full rendered form, with prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this hash matches the digest of `bytes`.
    pub fn matches_bytes(&self, bytes: &[u8]) -> bool {
        *self == Self::from_bytes(bytes)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
