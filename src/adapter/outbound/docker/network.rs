use async_trait::async_trait;
use serde::Deserialize;

use super::{parse, DockerCli, INSPECT_FORMAT};
use crate::domain::{Labels, Network, NetworkInfo};
use crate::error::Result;
use crate::port::NetworkOps;

pub(super) fn create_args(network: &Network) -> Vec<String> {
    let mut args: Vec<String> = vec!["network".into(), "create".into()];
    if !network.driver.is_empty() {
        args.push(format!("--driver={}", network.driver));
    }
    if !network.subnet.is_empty() {
        args.push(format!("--subnet={}", network.subnet));
    }
    if !network.gateway.is_empty() {
        args.push(format!("--gateway={}", network.gateway));
    }
    for (key, value) in &network.labels {
        args.push(format!("--label={key}={value}"));
    }
    args.push(network.name.clone());
    args
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
    driver: String,
    #[serde(default)]
    labels: Option<Labels>,
}

impl From<InspectOutput> for NetworkInfo {
    fn from(raw: InspectOutput) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            created: parse::timestamp(&raw.created),
            driver: raw.driver,
            labels: raw.labels.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl NetworkOps for DockerCli {
    async fn create_network(&self, network: &Network) -> Result<String> {
        self.run("create network", &network.name, create_args(network))
            .await
    }

    async fn delete_network(&self, name: &str) -> Result<()> {
        let args = vec!["network".into(), "rm".into(), name.to_string()];
        self.run("delete network", name, args).await.map(drop)
    }

    async fn inspect_network(&self, name: &str) -> Result<Option<NetworkInfo>> {
        let args = vec![
            "network".into(),
            "inspect".into(),
            "--format".into(),
            INSPECT_FORMAT.into(),
            name.to_string(),
        ];
        let Some(stdout) = self.inspect("inspect network", name, args).await? else {
            return Ok(None);
        };
        let raw: InspectOutput = serde_json::from_str(&stdout)?;
        Ok(Some(raw.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CLUSTER_LABEL;

    #[test]
    fn create_args_carry_labels_and_name_last() {
        let mut network = Network::for_cluster("demo");
        network.driver = "bridge".into();
        network.labels = Labels::from([(CLUSTER_LABEL.to_string(), "demo".to_string())]);

        let args = create_args(&network);
        assert_eq!(
            args,
            vec![
                "network",
                "create",
                "--driver=bridge",
                "--label=hind.cluster=demo",
                "hind.demo"
            ]
        );
    }

    #[test]
    fn inspect_output_with_null_labels() {
        let raw: InspectOutput = serde_json::from_str(
            r#"{"Name":"hind.demo","Id":"n1","Created":"2024-03-05T10:11:12Z","Driver":"bridge","Labels":null}"#,
        )
        .unwrap();
        let info = NetworkInfo::from(raw);

        assert_eq!(info.name, "hind.demo");
        assert!(info.labels.is_empty());
        assert!(info.created.is_some());
    }
}
