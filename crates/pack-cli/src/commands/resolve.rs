//! `pack resolve` command implementation.
//!
//! Resolves a pack against the install root and sources and prints the
//! resulting plan. Conflicts are reported as warnings; only fatal resolution
//! errors make the command fail.

use pack_config::ResolveDefaults;
use pack_core::error::PackResult;
use pack_resolver::{InstallationPlan, ResolveOptions};

use super::CommandContext;

/// Arguments of `pack resolve`
#[derive(Debug, Clone)]
pub struct ResolveArgs {
    pub pack: String,
    pub range: String,
    pub no_optional: bool,
    pub no_peer: bool,
    pub max_depth: Option<usize>,
    pub strict: bool,
    pub json: bool,
}

/// Execute the `pack resolve` command
pub fn execute(args: &ResolveArgs, ctx: &CommandContext) -> PackResult<()> {
    let options = resolve_options(&ctx.config.resolve, args);
    let plan = ctx.resolver.resolve(&args.pack, &args.range, &options)?;

    if args.json {
        return ctx.output.json(&plan);
    }

    for line in summary_lines(&plan) {
        ctx.output.line(&line);
    }

    let conflicts = ctx.resolver.check_conflicts(&plan);
    if conflicts.is_empty() {
        ctx.output.success("No conflicts");
    } else {
        for conflict in conflicts {
            ctx.output.warn(&conflict.to_string());
        }
    }

    Ok(())
}

/// Configured defaults with command-line flags applied on top
pub fn resolve_options(defaults: &ResolveDefaults, args: &ResolveArgs) -> ResolveOptions {
    ResolveOptions {
        allow_optional: defaults.allow_optional && !args.no_optional,
        allow_peer: defaults.allow_peer && !args.no_peer,
        max_depth: args.max_depth.unwrap_or(defaults.max_depth),
        strict_ranges: defaults.strict_ranges || args.strict,
    }
}

/// Human-readable plan, without conflicts
pub fn summary_lines(plan: &InstallationPlan) -> Vec<String> {
    let mut lines = vec![format!(
        "{}@{} ({} dependencies)",
        plan.target,
        plan.version,
        plan.dependencies.len()
    )];

    if !plan.dependencies.is_empty() {
        lines.push(String::new());
        lines.push("Dependencies:".to_string());
        for dep in &plan.dependencies {
            let state = if dep.is_installed { "installed" } else { "available" };
            lines.push(format!(
                "  {}@{} ({}, {} from {})",
                dep.name, dep.version, state, dep.requested, dep.required_by
            ));
        }
    }

    lines.push(String::new());
    lines.push("Actions:".to_string());
    lines.extend(plan.actions.iter().map(|action| format!("  {}", action)));
    lines.push(action_totals(plan));
    lines
}

/// One-line tally of the plan's actions, e.g. `1 install, 2 skip`
pub fn action_totals(plan: &InstallationPlan) -> String {
    if plan.pending_actions().next().is_none() {
        return "Nothing to change".to_string();
    }

    plan.action_counts()
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect::<Vec<_>>()
        .join(", ")
}
