//! `pack check` command implementation.

use pack_core::error::PackResult;
use pack_resolver::semver;

use crate::output::OutputHandler;

/// Print whether `version` satisfies `range`
pub fn execute(range: &str, version: &str, output: &OutputHandler) -> PackResult<()> {
    let result = semver::satisfies(version, range)?;
    output.line(&result.to_string());
    Ok(())
}
