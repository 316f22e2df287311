//! Handler for the `stop` command.

use std::time::Duration;

use serde_json::json;

use super::context::CommandContext;
use super::output;
use crate::error::{Error, ResourceKind, Result};

/// Execute the stop command.
pub async fn execute(
    ctx: &CommandContext,
    name: Option<&str>,
    timeout: Option<Duration>,
) -> Result<()> {
    let name = ctx.resolve_name(name);
    let limit = timeout.unwrap_or(Duration::from_secs(ctx.settings.timeouts.stop));

    let mut manager = ctx.manager(&name, "latest")?;
    if !manager.config_exists() {
        return Err(Error::not_found(ResourceKind::Cluster, &name));
    }

    output::header(env!("CARGO_PKG_VERSION"));
    let pb = output::spinner(&format!("Stopping cluster {}", output::highlight(&name)));
    let task = format!("stopping cluster '{name}'");
    let report = match ctx.with_timeout(limit, &task, manager.stop()).await {
        Ok(report) => report,
        Err(e) => {
            output::spinner_fail(&pb, &format!("Failed to stop cluster {name}"));
            return Err(e);
        }
    };
    output::spinner_success(&pb, &format!("Stopped cluster {}", output::highlight(&name)));

    if output::is_json() {
        output::json_output(json!({
            "command": "stop",
            "cluster": name,
            "report": report,
        }));
        return Ok(());
    }

    output::field("Stopped", report.stopped);
    if report.already_stopped > 0 {
        output::field("Idle", report.already_stopped);
    }
    if report.missing > 0 {
        output::warning(&format!("{} configured nodes do not exist", report.missing));
        output::hint(&format!(
            "run {} to recreate them",
            output::highlight(format!("hind start {name}"))
        ));
    }
    Ok(())
}
