//! `pack list` command implementation.

use std::path::PathBuf;

use pack_core::error::PackResult;
use pack_core::types::{InstalledPack, Version};
use serde::Serialize;

use super::CommandContext;

/// One row of `pack list --json`
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub version: Version,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<String>,
}

impl From<InstalledPack> for ListEntry {
    fn from(pack: InstalledPack) -> Self {
        Self {
            name: pack.name,
            version: pack.version,
            path: pack.path,
            installed_at: pack.installed_at.map(|time| time.to_rfc3339()),
        }
    }
}

/// Execute the `pack list` command
pub fn execute(json: bool, ctx: &CommandContext) -> PackResult<()> {
    let entries: Vec<ListEntry> = ctx
        .resolver
        .list_installed()
        .into_iter()
        .map(ListEntry::from)
        .collect();

    if json {
        return ctx.output.json(&entries);
    }

    if entries.is_empty() {
        ctx.output
            .info(&format!("No packs installed in {}", ctx.config.install_root));
        return Ok(());
    }

    for line in table_lines(&entries) {
        ctx.output.line(&line);
    }
    Ok(())
}

/// `name  version  path` rows with aligned columns
pub fn table_lines(entries: &[ListEntry]) -> Vec<String> {
    let name_width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let version_width = entries
        .iter()
        .map(|e| e.version.to_string().len())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| {
            format!(
                "{:name_width$}  {:version_width$}  {}",
                entry.name,
                entry.version.to_string(),
                entry.path.display(),
            )
        })
        .collect()
}
