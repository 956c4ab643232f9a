//! `pack tree` command implementation.

use pack_core::error::PackResult;

use super::CommandContext;
use crate::output::tree::render_tree;

/// Execute the `pack tree` command
pub fn execute(pack: &str, ctx: &CommandContext) -> PackResult<()> {
    let tree = ctx.resolver.build_tree(pack)?;

    for line in render_tree(&tree, ctx.output.colors()) {
        ctx.output.line(&line);
    }
    ctx.output.info(&format!(
        "{} packs, {} levels deep",
        tree.node_count(),
        tree.max_depth()
    ));
    Ok(())
}
