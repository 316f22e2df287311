//! Handler for the `get` command.

use std::time::Duration;

use serde_json::json;
use tabled::{Table, Tabled};

use super::context::CommandContext;
use super::output;
use crate::domain::{Cluster, ClusterHealth, ClusterInfo};
use crate::error::Result;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "NODE")]
    name: String,
    #[tabled(rename = "IMAGE")]
    image: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "PORTS")]
    ports: String,
}

/// Execute the get command.
pub async fn execute(
    ctx: &CommandContext,
    name: Option<&str>,
    timeout: Option<Duration>,
) -> Result<()> {
    let name = ctx.resolve_name(name);
    let limit = timeout.unwrap_or(Duration::from_secs(ctx.settings.timeouts.get));

    let mut manager = ctx.manager(&name, "latest")?;
    manager.load()?;
    let task = format!("reading cluster '{name}'");
    let info = ctx.with_timeout(limit, &task, manager.get()).await?;
    let config = manager.config();
    let health = ClusterHealth::aggregate(&info.containers, config.nodes.len());

    if output::is_json() {
        output::json_output(json!({
            "command": "get",
            "cluster": name,
            "version": config.version,
            "health": health,
            "active": ctx.active_cluster == name,
            "info": serde_json::to_value(&info)?,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Cluster", output::highlight(&name));
    output::field("Version", &config.version);
    output::field("Status", output::status(health.as_str()));
    output::field(
        "Network",
        info.network
            .as_ref()
            .map_or_else(|| output::muted("absent"), |n| n.name.clone()),
    );
    output::field(
        "Nodes",
        format!("{}/{} running", info.running_count(), config.nodes.len()),
    );

    println!();
    output::lines(&Table::new(rows(config, &info)).to_string());
    Ok(())
}

/// One row per configured node; nodes without a container show as `missing`.
fn rows(config: &Cluster, info: &ClusterInfo) -> Vec<NodeRow> {
    config
        .nodes
        .iter()
        .map(|node| {
            let container = info.containers.iter().find(|c| c.name == node.name);
            NodeRow {
                name: node.name.clone(),
                image: node.image.reference(),
                state: container.map_or_else(
                    || "missing".to_string(),
                    |c| c.status.as_str().to_string(),
                ),
                ports: container.map(|c| c.ports.join(", ")).unwrap_or_default(),
            }
        })
        .collect()
}
