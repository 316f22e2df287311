//! Handler for the `start` command.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use super::context::CommandContext;
use super::output;
use crate::application::{ClusterManager, StartOutcome};
use crate::domain::{Cluster, NodeKind};
use crate::error::{Result, ResultExt};

/// Execute the start command.
pub async fn execute(
    ctx: &CommandContext,
    name: Option<&str>,
    release: &str,
    clients: Option<u16>,
    timeout: Option<Duration>,
) -> Result<()> {
    let name = ctx.resolve_name(name);
    let limit = timeout.unwrap_or(Duration::from_secs(ctx.settings.timeouts.start));
    let mut manager = ctx.manager(&name, release)?;

    output::header(env!("CARGO_PKG_VERSION"));
    let pb = output::spinner(&format!("Starting cluster {}", output::highlight(&name)));

    let task = format!("starting cluster '{name}'");
    let result = ctx
        .with_timeout(limit, &task, bring_up(ctx, &mut manager, clients))
        .await;
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            output::spinner_fail(&pb, &format!("Failed to start cluster {name}"));
            return Err(e);
        }
    };

    let verb = match outcome {
        StartOutcome::Created => "Created",
        StartOutcome::Resumed => "Started",
    };
    output::spinner_success(&pb, &format!("{verb} cluster {}", output::highlight(&name)));

    if let Err(e) = ctx.active.set(&name) {
        output::warning(&format!("Failed to set active cluster: {e}"));
    }

    let endpoints = endpoints(manager.config());
    if output::is_json() {
        output::json_output(json!({
            "command": "start",
            "cluster": name,
            "outcome": outcome,
            "nodes": manager.config().node_names(),
            "endpoints": endpoints
                .iter()
                .map(|(service, url)| json!({ "service": service, "url": url }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::field("Nodes", manager.config().nodes.len());
    output::field("Clients", manager.count_client_nodes());
    if !endpoints.is_empty() {
        output::section("Connection information");
        for (service, url) in &endpoints {
            output::field(service, output::highlight(url));
        }
    }
    Ok(())
}

/// Ping the runtime, apply the requested client count, and converge.
async fn bring_up(
    ctx: &CommandContext,
    manager: &mut ClusterManager,
    clients: Option<u16>,
) -> Result<StartOutcome> {
    ctx.runtime
        .list_containers(&[])
        .await
        .context("container runtime is not reachable")?;

    if !manager.config_exists() {
        if let Some(count) = clients.filter(|&c| c != 1) {
            manager
                .set_client_count(usize::from(count))
                .context("failed to set client count")?;
        }
    }

    let outcome = manager.start().await?;

    if outcome == StartOutcome::Resumed {
        if let Some(target) = clients.map(usize::from) {
            let current = manager.count_client_nodes();
            if target != current {
                debug!(from = current, to = target, "Client count change requested");
                manager
                    .scale(target)
                    .await
                    .context("failed to scale cluster")?;
            }
        }
    }
    Ok(outcome)
}

/// Published UI endpoints, labelled by service.
fn endpoints(cluster: &Cluster) -> Vec<(&'static str, String)> {
    let mut endpoints = Vec::new();
    for node in cluster.nodes.iter().filter(|n| !n.is_client()) {
        let service = match node.kind {
            NodeKind::Nomad => "Nomad",
            NodeKind::Consul => "Consul",
            NodeKind::Vault => "Vault",
        };
        for port in node.ports.iter().filter(|p| p.host_port != 0) {
            let host = if port.listen_address.is_empty() || port.listen_address == "0.0.0.0" {
                "localhost"
            } else {
                port.listen_address.as_str()
            };
            endpoints.push((service, format!("http://{host}:{}", port.host_port)));
        }
    }
    endpoints
}
