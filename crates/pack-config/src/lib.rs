//! Configuration for the pack dependency engine
//!
//! This crate decides where installed packs live, where not-yet-installed
//! pack sources are searched, and the default resolution options. Values are
//! layered: built-in defaults, then `~/.pack/config.toml`, then `PACK_*`
//! environment variables, then command-line flags.

pub mod merge;
pub mod toml;

// Re-export main types
pub use self::merge::{CliOverrides, ConfigLayering, ConfigLoader, ConfigSource, LoadedConfig};
pub use self::toml::{ConfigFile, ResolveSection};

use camino::{Utf8Path, Utf8PathBuf};
use pack_core::error::PackError;
use pack_core::types::manifest::MANIFEST_FILE;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, PackError>;

/// Directory below the home directory holding pack state
pub const PACK_DIR: &str = ".pack";

/// Default recursion limit for dependency resolution
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Fully merged configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PackConfig {
    /// Directory holding one subdirectory per installed pack
    pub install_root: Utf8PathBuf,
    /// Directories searched, in order, for packs that are not installed
    pub sources: Vec<Utf8PathBuf>,
    /// Manifest file name inside every pack directory
    pub manifest_file: String,
    pub resolve: ResolveDefaults,
}

/// Default options for `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveDefaults {
    pub allow_optional: bool,
    pub allow_peer: bool,
    pub max_depth: usize,
    pub strict_ranges: bool,
}

impl Default for ResolveDefaults {
    fn default() -> Self {
        Self {
            allow_optional: true,
            allow_peer: true,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_ranges: false,
        }
    }
}

impl PackConfig {
    /// Built-in defaults rooted at `pack_dir` (normally `~/.pack`)
    pub fn defaults(pack_dir: &Utf8Path) -> Self {
        Self {
            install_root: pack_dir.join("packs"),
            sources: vec![pack_dir.join("sources")],
            manifest_file: MANIFEST_FILE.to_string(),
            resolve: ResolveDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PackConfig::defaults(Utf8Path::new("/home/dev/.pack"));
        assert_eq!(config.install_root, "/home/dev/.pack/packs");
        assert_eq!(config.sources, [Utf8PathBuf::from("/home/dev/.pack/sources")]);
        assert_eq!(config.manifest_file, "pack.json");
        assert_eq!(config.resolve.max_depth, 10);
        assert!(config.resolve.allow_optional);
        assert!(config.resolve.allow_peer);
        assert!(!config.resolve.strict_ranges);
    }
}
