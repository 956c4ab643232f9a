//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;
use camino::Utf8PathBuf;
use pack_core::error::PackError;
use tracing::debug;
use crate::{ConfigResult, PackConfig, PACK_DIR, toml::ConfigFile};

/// Environment variable naming the installation root
pub const ENV_HOME: &str = "PACK_HOME";
/// Environment variable listing source directories (platform path-list syntax)
pub const ENV_SOURCES: &str = "PACK_SOURCES";
/// Environment variable overriding the manifest file name
pub const ENV_MANIFEST: &str = "PACK_MANIFEST";
/// Environment variable overriding the resolution depth limit
pub const ENV_MAX_DEPTH: &str = "PACK_MAX_DEPTH";

/// Main configuration loading interface
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// User home directory, when one can be determined
    home_dir: Option<Utf8PathBuf>,
}

/// Configuration layers, lowest priority first
#[derive(Debug, Clone, Default)]
pub struct ConfigLayering {
    /// Global config file and where it was read from
    global_config: Option<(Utf8PathBuf, ConfigFile)>,
    /// `PACK_*` environment variables
    env_overrides: HashMap<String, String>,
    /// Command-line flags
    cli_overrides: CliOverrides,
}

/// Flags from the command line that override configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub home: Option<Utf8PathBuf>,
    /// Replaces all configured sources when non-empty
    pub sources: Vec<Utf8PathBuf>,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in default
    Default,
    /// Global config file
    Global(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

/// Merged configuration plus where the installation root came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: PackConfig,
    pub install_root_source: ConfigSource,
}

impl ConfigLoader {
    /// Create a loader for the current user
    pub fn new() -> Self {
        let home_dir = dirs::home_dir().and_then(|p| Utf8PathBuf::from_path_buf(p).ok());
        Self { home_dir }
    }

    /// Create a loader with an explicit home directory
    pub fn with_home_dir(home_dir: Option<Utf8PathBuf>) -> Self {
        Self { home_dir }
    }

    /// `~/.pack`, or a relative `.pack` when no home directory is known
    pub fn pack_dir(&self) -> Utf8PathBuf {
        match &self.home_dir {
            Some(home) => home.join(PACK_DIR),
            None => Utf8PathBuf::from(PACK_DIR),
        }
    }

    /// Path of the global config file
    pub fn global_config_path(&self) -> Utf8PathBuf {
        self.pack_dir().join("config.toml")
    }

    /// Load global configuration, if the file exists
    pub fn load_global_config(&self) -> ConfigResult<Option<(Utf8PathBuf, ConfigFile)>> {
        let path = self.global_config_path();
        if path.is_file() {
            let config = crate::toml::load_from_file(&path)?;
            Ok(Some((path, config)))
        } else {
            debug!("No global config at {}", path);
            Ok(None)
        }
    }

    /// Load and merge every layer
    pub fn load(
        &self,
        env_overrides: HashMap<String, String>,
        cli_overrides: CliOverrides,
    ) -> ConfigResult<LoadedConfig> {
        let layering = ConfigLayering {
            global_config: self.load_global_config()?,
            env_overrides,
            cli_overrides,
        };
        layering.merge(PackConfig::defaults(&self.pack_dir()))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLayering {
    /// Create a new configuration layering system
    pub fn new(
        global_config: Option<(Utf8PathBuf, ConfigFile)>,
        env_overrides: HashMap<String, String>,
        cli_overrides: CliOverrides,
    ) -> Self {
        Self {
            global_config,
            env_overrides,
            cli_overrides,
        }
    }

    /// Apply all layers on top of `defaults`
    pub fn merge(self, defaults: PackConfig) -> ConfigResult<LoadedConfig> {
        let mut merged = defaults;
        let mut install_root_source = ConfigSource::Default;

        if let Some((path, global)) = self.global_config {
            if Self::apply_file(&mut merged, global) {
                install_root_source = ConfigSource::Global(path);
            }
        }

        if let Some(var) = Self::apply_env_overrides(&mut merged, &self.env_overrides)? {
            install_root_source = ConfigSource::Environment(var);
        }

        // CLI flag overrides (highest priority)
        if let Some(home) = self.cli_overrides.home {
            merged.install_root = home;
            install_root_source = ConfigSource::CommandLine;
        }
        if !self.cli_overrides.sources.is_empty() {
            merged.sources = self.cli_overrides.sources;
        }

        debug!(
            "Install root {} (from {:?}), {} source dir(s)",
            merged.install_root,
            install_root_source,
            merged.sources.len()
        );

        Ok(LoadedConfig {
            config: merged,
            install_root_source,
        })
    }

    /// Apply config file values; returns whether it set the install root
    fn apply_file(config: &mut PackConfig, file: ConfigFile) -> bool {
        if let Some(sources) = file.sources {
            config.sources = sources;
        }
        if let Some(manifest) = file.manifest {
            config.manifest_file = manifest;
        }
        if let Some(allow_optional) = file.resolve.allow_optional {
            config.resolve.allow_optional = allow_optional;
        }
        if let Some(allow_peer) = file.resolve.allow_peer {
            config.resolve.allow_peer = allow_peer;
        }
        if let Some(max_depth) = file.resolve.max_depth {
            config.resolve.max_depth = max_depth;
        }
        if let Some(strict_ranges) = file.resolve.strict_ranges {
            config.resolve.strict_ranges = strict_ranges;
        }
        match file.home {
            Some(home) => {
                config.install_root = home;
                true
            },
            None => false,
        }
    }

    /// Apply environment variable overrides; returns the variable that set
    /// the install root, if any
    fn apply_env_overrides(
        config: &mut PackConfig,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<Option<String>> {
        let mut root_var = None;

        for (key, value) in overrides {
            match key.as_str() {
                ENV_HOME => {
                    if value.is_empty() {
                        continue;
                    }
                    config.install_root = Utf8PathBuf::from(value);
                    root_var = Some(key.clone());
                }
                ENV_SOURCES => {
                    config.sources = split_source_list(value)?;
                }
                ENV_MANIFEST => {
                    crate::toml::validate_manifest_name(value, ENV_MANIFEST)?;
                    config.manifest_file = value.clone();
                }
                ENV_MAX_DEPTH => {
                    config.resolve.max_depth = value.trim().parse()
                        .map_err(|_| PackError::ConfigValidation {
                            field: ENV_MAX_DEPTH.to_string(),
                            reason: format!("'{}' is not a non-negative integer", value),
                        })?;
                }
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(root_var)
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with("PACK_"))
            .collect()
    }
}

/// Split a `PACK_SOURCES` value using the platform path-list separator
fn split_source_list(value: &str) -> ConfigResult<Vec<Utf8PathBuf>> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| {
            Utf8PathBuf::from_path_buf(p).map_err(|p| PackError::ConfigValidation {
                field: ENV_SOURCES.to_string(),
                reason: format!("{} is not valid UTF-8", p.display()),
            })
        })
        .collect()
}
