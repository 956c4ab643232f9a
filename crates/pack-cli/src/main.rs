//! # pack-cli
//!
//! Command-line front end for the pack dependency engine.
//!
//! Parses arguments, sets up logging, loads configuration and dispatches to
//! the command handlers. Command output goes to stdout; logs and errors go
//! to stderr.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use pack_config::CliOverrides;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use output::{errors::ErrorFormatter, OutputHandler};

/// Resolve, inspect and check pack dependencies
#[derive(Parser)]
#[command(name = "pack", version, about = "Pack dependency resolver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Installation root (overrides PACK_HOME and the config file)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<Utf8PathBuf>,

    /// Pack source directory; repeat to search several, in order
    #[arg(long = "source", global = true, value_name = "DIR")]
    pub sources: Vec<Utf8PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a pack into an installation plan
    Resolve {
        pack: String,
        /// Version range, `*` for any version
        #[arg(default_value = "*")]
        range: String,
        /// Do not resolve optional dependencies
        #[arg(long)]
        no_optional: bool,
        /// Do not check peer dependencies
        #[arg(long)]
        no_peer: bool,
        /// Stop expanding manifests below this depth
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
        /// Check duplicate requests by exact range intersection
        #[arg(long)]
        strict: bool,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List installed packs
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the dependency tree of an installed pack
    Tree { pack: String },
    /// Check whether a version satisfies a range
    Check {
        range: String,
        #[arg(value_name = "VERSION")]
        candidate: String,
    },
    /// Pick the highest candidate version satisfying a range
    Best {
        range: String,
        #[arg(required = true)]
        candidates: Vec<String>,
        /// Consider prerelease versions
        #[arg(long)]
        pre: bool,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    let overrides = CliOverrides {
        home: cli.home,
        sources: cli.sources,
    };

    match commands::dispatch_command(cli.command, overrides, OutputHandler::new()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pack=debug,pack_core=debug,pack_config=debug,pack_resolver=debug")
        } else {
            EnvFilter::new("pack=info,pack_config=warn,pack_resolver=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("pack encountered an unexpected error: {}", panic_info);
        eprintln!("pack crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
