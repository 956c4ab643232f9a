//! `config.toml` parsing and validation

use camino::{Utf8Path, Utf8PathBuf};
use pack_core::error::PackError;
use serde::{Deserialize, Serialize};
use crate::ConfigResult;

/// Contents of the global `~/.pack/config.toml`
///
/// Every field is optional; absent fields fall through to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Installation root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<Utf8PathBuf>,

    /// Pack source directories, searched in order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Utf8PathBuf>>,

    /// Manifest file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,

    #[serde(default)]
    pub resolve: ResolveSection,
}

/// `[resolve]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ResolveSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_optional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_peer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_ranges: Option<bool>,
}

/// Parse TOML string into a `ConfigFile`
pub fn parse_config(content: &str, origin: &str) -> ConfigResult<ConfigFile> {
    let config: ConfigFile = ::toml::from_str(content).map_err(|e| PackError::ConfigParse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate field values that TOML typing cannot express
pub fn validate_config(config: &ConfigFile) -> ConfigResult<()> {
    if let Some(manifest) = &config.manifest {
        validate_manifest_name(manifest, "manifest")?;
    }

    if let Some(sources) = &config.sources {
        if sources.iter().any(|s| s.as_str().is_empty()) {
            return Err(PackError::ConfigValidation {
                field: "sources".to_string(),
                reason: "source directories must not be empty strings".to_string(),
            });
        }
    }

    Ok(())
}

/// A manifest file name must be a bare file name
pub fn validate_manifest_name(name: &str, field: &str) -> ConfigResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(PackError::ConfigValidation {
            field: field.to_string(),
            reason: format!("'{}' is not a plain file name", name),
        });
    }
    Ok(())
}

/// Load and parse a config file; relative paths are anchored at its directory
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PackError::io(format!("Failed to read {}", path), e))?;

    let mut config = parse_config(&content, path.as_str())?;

    if let Some(base) = path.parent() {
        if let Some(home) = config.home.as_mut() {
            *home = anchor(base, home);
        }
        if let Some(sources) = config.sources.as_mut() {
            for source in sources.iter_mut() {
                *source = anchor(base, source);
            }
        }
    }

    Ok(config)
}

fn anchor(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("", "config.toml").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
home = "/srv/packs"
sources = ["/srv/sources", "/opt/shared"]
manifest = "manifest.json"

[resolve]
allow-optional = false
max-depth = 4
strict-ranges = true
"#;
        let config = parse_config(content, "config.toml").unwrap();
        assert_eq!(config.home.as_deref(), Some(Utf8Path::new("/srv/packs")));
        assert_eq!(config.sources.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.manifest.as_deref(), Some("manifest.json"));
        assert_eq!(config.resolve.allow_optional, Some(false));
        assert_eq!(config.resolve.allow_peer, None);
        assert_eq!(config.resolve.max_depth, Some(4));
        assert_eq!(config.resolve.strict_ranges, Some(true));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config("colour = true", "config.toml").unwrap_err();
        assert!(matches!(err, PackError::ConfigParse { .. }));
    }

    #[test]
    fn test_invalid_manifest_name() {
        let err = parse_config(r#"manifest = "../pack.json""#, "config.toml").unwrap_err();
        assert!(matches!(err, PackError::ConfigValidation { ref field, .. } if field == "manifest"));
    }

    #[test]
    fn test_relative_paths_anchored() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let path = base.join("config.toml");
        std::fs::write(&path, "home = \"installed\"\nsources = [\"/abs/src\", \"local\"]\n").unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.home, Some(base.join("installed")));
        assert_eq!(
            config.sources,
            Some(vec![Utf8PathBuf::from("/abs/src"), base.join("local")])
        );
    }
}
