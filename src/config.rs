//! Vendor configuration
//!
//! `vendo.yaml` declares tracked sources and their path mappings:
//!
//! ```yaml
//! sources:
//!   - name: utils
//!     repo: https://example.com/org/utils.git
//!     ref: main
//!     mappings:
//!       - from: src/lib.rs:L10-L40
//!         to: vendor/utils/core.rs
//!       - from: assets/
//!         to: vendor/assets/
//!         exclude: ["*.png"]
//! ```
//!
//! Unknown keys are collected as non-fatal warnings rather than rejected, so
//! configs written for a newer vendo still load.

use std::fs;
use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{VendoError, VendoResult};
use crate::ownership::MappingOwner;
use crate::position::strip_position;

/// Maximum number of exclude patterns per mapping
const MAX_EXCLUDE_PATTERNS: usize = 1000;

/// One vendored unit: a source path (optionally position-suffixed) and a
/// destination path (optionally position-suffixed; empty derives from `from`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    pub from: String,
    #[serde(default)]
    pub to: String,
    /// Glob patterns to skip; meaningful for directory mappings only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl PathMapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            exclude: Vec::new(),
        }
    }

    /// The destination path used for ownership comparison: `to` with any
    /// position suffix stripped, falling back to the basename of the
    /// (position-stripped) `from` when `to` is empty or `.`.
    ///
    /// The fallback is essential - without it every auto-named mapping would
    /// collapse onto `.` and produce spurious conflicts.
    pub fn effective_destination(&self) -> VendoResult<String> {
        let to = strip_position(&self.to)?;
        if !to.is_empty() && to != "." {
            return Ok(to);
        }

        let from = strip_position(&self.from)?;
        let normalized = from.replace('\\', "/");
        let base = normalized
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
            .to_string();
        Ok(base)
    }

    /// Whether the `from` side carries a position suffix.
    ///
    /// Malformed suffixes count as positional here; the parse error itself
    /// surfaces wherever the mapping is actually used.
    pub fn is_positional(&self) -> bool {
        !matches!(
            crate::position::parse_path_position(&self.from),
            Ok((_, None))
        )
    }

    /// Compile the exclude globs into a gitignore-semantics matcher.
    pub fn exclude_matcher(&self) -> VendoResult<Gitignore> {
        if self.exclude.len() > MAX_EXCLUDE_PATTERNS {
            return Err(VendoError::InvalidExclude {
                pattern: format!("({} patterns)", self.exclude.len()),
                from: self.from.clone(),
                message: format!("more than {} exclude patterns", MAX_EXCLUDE_PATTERNS),
            });
        }

        let mut builder = GitignoreBuilder::new("");
        for pattern in &self.exclude {
            builder
                .add_line(None, pattern)
                .map_err(|e| VendoError::InvalidExclude {
                    pattern: pattern.clone(),
                    from: self.from.clone(),
                    message: e.to_string(),
                })?;
        }
        builder.build().map_err(|e| VendoError::InvalidExclude {
            pattern: String::new(),
            from: self.from.clone(),
            message: e.to_string(),
        })
    }
}

/// A tracked upstream repository and its mappings at one ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub repo: String,
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
    #[serde(default)]
    pub mappings: Vec<PathMapping>,
}

fn default_ref() -> String {
    "main".to_string()
}

/// Root of `vendo.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
}

impl VendorConfig {
    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load(path: &Path) -> VendoResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(path, &content)
    }

    /// Parse YAML content, collecting unknown-key warnings.
    pub fn from_yaml(path: &Path, content: &str) -> VendoResult<(Self, Vec<ConfigWarning>)> {
        let mut unknown: Vec<String> = Vec::new();
        let deserializer = serde_yaml_ng::Deserializer::from_str(content);

        let config: VendorConfig = serde_ignored::deserialize(deserializer, |p| {
            unknown.push(p.to_string());
        })
        .map_err(|e| VendoError::Config {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown
            .into_iter()
            .map(|path_str| ConfigWarning {
                key: path_str
                    .split('.')
                    .next_back()
                    .unwrap_or(path_str.as_str())
                    .to_string(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Flatten every mapping across every source into the conflict
    /// detector's input.
    pub fn owners(&self) -> Vec<MappingOwner> {
        self.sources
            .iter()
            .flat_map(|source| {
                source.mappings.iter().map(|mapping| MappingOwner {
                    source: source.name.clone(),
                    mapping: mapping.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(yaml: &str) -> (VendorConfig, Vec<ConfigWarning>) {
        VendorConfig::from_yaml(&PathBuf::from("vendo.yaml"), yaml).unwrap()
    }

    #[test]
    fn parses_full_config() {
        let (config, warnings) = parse(
            r#"
sources:
  - name: utils
    repo: https://example.com/org/utils.git
    ref: v2
    mappings:
      - from: src/lib.rs:L10-L40
        to: vendor/utils/core.rs
      - from: assets/
        to: vendor/assets/
        exclude: ["*.png"]
"#,
        );
        assert!(warnings.is_empty());
        assert_eq!(config.sources.len(), 1);
        let source = &config.sources[0];
        assert_eq!(source.git_ref, "v2");
        assert_eq!(source.mappings.len(), 2);
        assert_eq!(source.mappings[1].exclude, vec!["*.png"]);
    }

    #[test]
    fn ref_defaults_to_main() {
        let (config, _) = parse(
            r#"
sources:
  - name: a
    repo: r
"#,
        );
        assert_eq!(config.sources[0].git_ref, "main");
    }

    #[test]
    fn unknown_keys_warn_but_load() {
        let (config, warnings) = parse(
            r#"
sources:
  - name: a
    repo: r
    branch: main
"#,
        );
        assert_eq!(config.sources.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "branch");
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let err = VendorConfig::from_yaml(&PathBuf::from("vendo.yaml"), "sources: {").unwrap_err();
        assert!(matches!(err, VendoError::Config { .. }));
    }

    #[test]
    fn effective_destination_uses_to() {
        let m = PathMapping::new("src/a.rs", "vendor/a.rs");
        assert_eq!(m.effective_destination().unwrap(), "vendor/a.rs");
    }

    #[test]
    fn effective_destination_strips_position() {
        let m = PathMapping::new("src/a.rs:L1-L5", "vendor/a.rs:L10-L14");
        assert_eq!(m.effective_destination().unwrap(), "vendor/a.rs");
    }

    #[test]
    fn empty_to_uses_basename_of_from() {
        let m = PathMapping::new("src/utils/a.rs", "");
        assert_eq!(m.effective_destination().unwrap(), "a.rs");
    }

    #[test]
    fn dot_to_uses_basename_of_from() {
        let m = PathMapping::new("src/utils/a.rs:L3", ".");
        assert_eq!(m.effective_destination().unwrap(), "a.rs");
    }

    #[test]
    fn basename_handles_backslashes() {
        let m = PathMapping::new("src\\win\\a.rs", "");
        assert_eq!(m.effective_destination().unwrap(), "a.rs");
    }

    #[test]
    fn directory_from_uses_last_segment() {
        let m = PathMapping::new("assets/icons/", "");
        assert_eq!(m.effective_destination().unwrap(), "icons");
    }

    #[test]
    fn is_positional_detects_suffix() {
        assert!(PathMapping::new("a.rs:L5", "").is_positional());
        assert!(!PathMapping::new("a.rs", "").is_positional());
    }

    #[test]
    fn exclude_matcher_matches_globs() {
        let mut m = PathMapping::new("assets/", "vendor/assets/");
        m.exclude = vec!["*.png".to_string(), "tmp/".to_string()];
        let matcher = m.exclude_matcher().unwrap();
        assert!(matcher.matched("logo.png", false).is_ignore());
        assert!(!matcher.matched("logo.svg", false).is_ignore());
        assert!(matcher.matched("tmp", true).is_ignore());
    }

    #[test]
    fn owners_flattens_all_sources() {
        let (config, _) = parse(
            r#"
sources:
  - name: a
    repo: ra
    mappings:
      - from: x.rs
  - name: b
    repo: rb
    mappings:
      - from: y.rs
      - from: z.rs
"#,
        );
        let owners = config.owners();
        assert_eq!(owners.len(), 3);
        assert_eq!(owners[0].source, "a");
        assert_eq!(owners[2].mapping.from, "z.rs");
    }
}
