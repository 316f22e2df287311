//! Handler for the `set` subcommands.

use serde_json::json;

use super::context::CommandContext;
use super::output;
use crate::error::{Result, ResultExt};

/// Point the active cluster at `name`.
pub fn profile(ctx: &CommandContext, name: &str) -> Result<()> {
    ctx.active
        .set(name)
        .with_context(|| format!("failed to set active cluster to '{name}'"))?;

    if output::is_json() {
        output::json_output(json!({
            "command": "set.profile",
            "active": name,
        }));
        return Ok(());
    }
    output::success(&format!("Active cluster is now {}", output::highlight(name)));
    Ok(())
}
