//! Command implementations and dispatch logic.
//!
//! `check`, `best` and `version` are pure and run without configuration.
//! The remaining commands read the pack directories and get a
//! [`CommandContext`] built from the merged configuration.

use pack_config::{CliOverrides, ConfigLayering, ConfigLoader, LoadedConfig, PackConfig};
use pack_core::error::PackResult;
use pack_resolver::{DependencyResolver, PackStore};
use tracing::debug;

pub mod best;
pub mod check;
pub mod list;
pub mod resolve;
pub mod tree;


use crate::{output::OutputHandler, Commands};

/// Shared context for commands that read pack directories
pub struct CommandContext {
    pub config: PackConfig,
    pub resolver: DependencyResolver,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Load configuration from every layer and build the resolver
    pub fn load(overrides: CliOverrides, output: OutputHandler) -> PackResult<Self> {
        let LoadedConfig {
            config,
            install_root_source,
        } = ConfigLoader::new().load(ConfigLayering::collect_env_overrides(), overrides)?;

        debug!(
            "Install root {} (from {:?})",
            config.install_root, install_root_source
        );
        Ok(Self::from_config(config, output))
    }

    pub fn from_config(config: PackConfig, output: OutputHandler) -> Self {
        let store = PackStore::new(config.install_root.clone())
            .with_sources(config.sources.iter().cloned())
            .with_manifest_file(config.manifest_file.clone());

        Self {
            resolver: DependencyResolver::new(store),
            config,
            output,
        }
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(
    command: Commands,
    overrides: CliOverrides,
    output: OutputHandler,
) -> PackResult<()> {
    match command {
        Commands::Resolve {
            pack,
            range,
            no_optional,
            no_peer,
            max_depth,
            strict,
            json,
        } => {
            debug!("Resolving {}@{}", pack, range);
            let ctx = CommandContext::load(overrides, output)?;
            let args = resolve::ResolveArgs {
                pack,
                range,
                no_optional,
                no_peer,
                max_depth,
                strict,
                json,
            };
            resolve::execute(&args, &ctx)
        },
        Commands::List { json } => {
            let ctx = CommandContext::load(overrides, output)?;
            list::execute(json, &ctx)
        },
        Commands::Tree { pack } => {
            let ctx = CommandContext::load(overrides, output)?;
            tree::execute(&pack, &ctx)
        },
        Commands::Check { range, candidate } => check::execute(&range, &candidate, &output),
        Commands::Best {
            range,
            candidates,
            pre,
        } => best::execute(&range, &candidates, pre, &output),
        Commands::Version => {
            show_version(&output);
            Ok(())
        },
    }
}

/// Show version information
pub fn show_version(output: &OutputHandler) {
    output.line(&format!("pack {}", env!("CARGO_PKG_VERSION")));
    output.info(&format!("Built on {}", env!("PACK_BUILD_DATE")));
    output.info(&format!("Compiled with {}", env!("PACK_RUSTC_VERSION")));
}
