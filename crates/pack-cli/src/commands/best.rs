//! `pack best` command implementation.

use pack_core::error::PackResult;
use pack_resolver::semver;

use crate::output::OutputHandler;

/// Print the highest candidate satisfying `range`
pub fn execute(
    range: &str,
    candidates: &[String],
    allow_prerelease: bool,
    output: &OutputHandler,
) -> PackResult<()> {
    match semver::find_best_match(range, candidates, allow_prerelease)? {
        Some(version) => output.line(&version.to_string()),
        None => output.warn(&format!("No candidate satisfies {}", range)),
    }
    Ok(())
}
