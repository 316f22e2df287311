//! Handler for the `rm` command.

use std::time::Duration;

use serde_json::json;

use super::context::CommandContext;
use super::output;
use crate::error::{Error, ResourceKind, Result};

/// Execute the rm command.
pub async fn execute(
    ctx: &CommandContext,
    name: Option<&str>,
    timeout: Option<Duration>,
) -> Result<()> {
    let name = ctx.resolve_name(name);
    let limit = timeout.unwrap_or(Duration::from_secs(ctx.settings.timeouts.delete));

    let mut manager = ctx.manager(&name, "latest")?;
    if !manager.config_exists() {
        return Err(Error::not_found(ResourceKind::Cluster, &name));
    }

    output::header(env!("CARGO_PKG_VERSION"));
    let pb = output::spinner(&format!("Removing cluster {}", output::highlight(&name)));
    let task = format!("removing cluster '{name}'");
    let report = match ctx.with_timeout(limit, &task, manager.delete()).await {
        Ok(report) => report,
        Err(e) => {
            output::spinner_fail(&pb, &format!("Failed to remove cluster {name}"));
            return Err(e);
        }
    };
    output::spinner_success(&pb, &format!("Removed cluster {}", output::highlight(&name)));

    if ctx.active_cluster == name {
        if let Err(e) = ctx.active.clear() {
            output::warning(&format!("Failed to clear active cluster: {e}"));
        }
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "rm",
            "cluster": name,
            "report": report,
        }));
        return Ok(());
    }

    output::field("Nodes", report.deleted);
    output::field("Network", if report.network_deleted { "removed" } else { "absent" });
    Ok(())
}
