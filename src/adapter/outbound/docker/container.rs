use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::{filter_args, parse, DockerCli, INSPECT_FORMAT, LIST_FORMAT};
use crate::domain::{ContainerInfo, ContainerStatus, Labels, Node};
use crate::error::Result;
use crate::port::ContainerOps;

/// Flags shared by every node container: systemd-in-docker needs a private
/// cgroup namespace, tmpfs mounts and relaxed confinement.
const RUN_FLAGS: &[&str] = &[
    "--cgroupns=private",
    "--detach",
    "--init=false",
    "--privileged",
    "--restart",
    "on-failure:1",
    "--tmpfs",
    "/run",
    "--tmpfs",
    "/tmp",
    "--tty",
    "--security-opt",
    "seccomp=unconfined",
    "--security-opt",
    "apparmor=unconfined",
    "--volume",
    "/lib/modules:/lib/modules:ro",
    "--volume",
    "/var",
];

/// Arguments for `docker container run` creating `node`.
pub(super) fn run_args(node: &Node) -> Result<Vec<String>> {
    let mut args: Vec<String> = vec!["container".into(), "run".into()];
    args.extend(RUN_FLAGS.iter().map(|f| (*f).to_string()));

    if !node.network.is_empty() {
        args.push(format!("--network={}", node.network));
    }
    args.push(format!("--name={}", node.name));
    args.push(format!("--hostname={}", node.name));

    for port in &node.ports {
        args.push(format!("--publish={}", port.publish_spec()?));
    }
    for (key, value) in &node.environment {
        args.push(format!("--env={key}={value}"));
    }
    for (key, value) in &node.labels {
        args.push(format!("--label={key}={value}"));
    }
    for device in &node.devices {
        args.push(format!("--device={device}"));
    }
    for volume in &node.volumes {
        let spec = if !volume.source.is_empty() {
            format!("{}:{}", volume.source, volume.destination)
        } else if !volume.name.is_empty() {
            format!("{}:{}", volume.name, volume.destination)
        } else {
            volume.destination.clone()
        };
        args.push(format!("--volume={spec}"));
    }

    args.push(node.image.reference());
    Ok(args)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectOutput {
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    created: String,
    #[serde(default)]
    state: InspectState,
    #[serde(default)]
    config: InspectConfig,
    #[serde(default)]
    network_settings: InspectNetworkSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    #[serde(default)]
    hostname: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    labels: Option<Labels>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectNetworkSettings {
    #[serde(default)]
    ports: Option<BTreeMap<String, Option<Vec<PortBinding>>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PortBinding {
    #[serde(default)]
    host_ip: String,
    #[serde(default)]
    host_port: String,
}

impl From<InspectOutput> for ContainerInfo {
    fn from(raw: InspectOutput) -> Self {
        let mut ports = Vec::new();
        for (container_port, bindings) in raw.network_settings.ports.unwrap_or_default() {
            match bindings {
                Some(bindings) if !bindings.is_empty() => {
                    for b in bindings {
                        ports.push(format!("{}:{}->{container_port}", b.host_ip, b.host_port));
                    }
                }
                _ => ports.push(container_port),
            }
        }

        Self {
            id: raw.id,
            name: raw.name.trim_start_matches('/').to_string(),
            created: parse::timestamp(&raw.created),
            hostname: raw.config.hostname,
            status: ContainerStatus::normalize(&raw.state.status),
            image: raw.config.image,
            ports,
            labels: raw.config.labels.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListEntry {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(default)]
    names: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    labels: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    ports: String,
}

impl From<ListEntry> for ContainerInfo {
    fn from(raw: ListEntry) -> Self {
        let name = raw.names.split(',').next().unwrap_or_default().to_string();
        Self {
            id: raw.id,
            hostname: name.clone(),
            name,
            created: parse::timestamp(&raw.created_at),
            status: ContainerStatus::normalize(&raw.state),
            image: raw.image,
            ports: raw
                .ports
                .split(", ")
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            labels: parse::label_string(&raw.labels),
        }
    }
}

#[async_trait]
impl ContainerOps for DockerCli {
    async fn create_container(&self, node: &Node) -> Result<String> {
        let args = run_args(node)?;
        self.run("create container", &node.name, args).await
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        let args = vec!["container".into(), "start".into(), name.to_string()];
        self.run("start container", name, args).await.map(drop)
    }

    async fn stop_container(&self, name: &str) -> Result<()> {
        let args = vec!["container".into(), "stop".into(), name.to_string()];
        self.run("stop container", name, args).await.map(drop)
    }

    async fn delete_container(&self, name: &str) -> Result<()> {
        let args = vec!["container".into(), "rm".into(), name.to_string()];
        self.run("delete container", name, args).await.map(drop)
    }

    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerInfo>> {
        let args = vec![
            "container".into(),
            "inspect".into(),
            "--format".into(),
            INSPECT_FORMAT.into(),
            name.to_string(),
        ];
        let Some(stdout) = self.inspect("inspect container", name, args).await? else {
            return Ok(None);
        };
        let raw: InspectOutput = serde_json::from_str(&stdout)?;
        Ok(Some(raw.into()))
    }

    async fn list_containers(&self, filters: &[String]) -> Result<Vec<ContainerInfo>> {
        let mut args: Vec<String> = vec![
            "container".into(),
            "ls".into(),
            "--all".into(),
            "--no-trunc".into(),
            "--format".into(),
            LIST_FORMAT.into(),
        ];
        args.extend(filter_args(filters));

        let stdout = self.run("list containers", "all", args).await?;
        let rows: Vec<ListEntry> = parse::json_lines(&stdout)?;
        Ok(rows.into_iter().map(ContainerInfo::from).collect())
    }
}
