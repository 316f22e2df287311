//! Cluster configuration model.
//!
//! A [`Cluster`] is the desired shape of one environment: an ordered list of
//! [`Node`]s sharing a single [`Network`] and a release version. The same
//! types are persisted as camelCase JSON, so maps are ordered and optional
//! fields are skipped when empty.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::identity::{self, NodeIdentity};

/// Ordered string map used for environment variables and labels.
pub type Labels = BTreeMap<String, String>;

/// Label naming the cluster that owns a runtime resource.
pub const CLUSTER_LABEL: &str = "hind.cluster";

/// Label recording the release version a resource was created with.
pub const VERSION_LABEL: &str = "hind.version";

/// Service kind running inside a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Consul,
    Nomad,
    Vault,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consul => "consul",
            Self::Nomad => "nomad",
            Self::Vault => "vault",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Server,
    Client,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container image reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub digest: String,
}

impl Image {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            digest: String::new(),
        }
    }

    /// Reference passed to the runtime: `name@digest`, `name:tag` or `name`.
    #[must_use]
    pub fn reference(&self) -> String {
        if !self.digest.is_empty() {
            format!("{}@{}", self.name, self.digest)
        } else if !self.tag.is_empty() {
            format!("{}:{}", self.name, self.tag)
        } else {
            self.name.clone()
        }
    }
}

/// Port published from a node to the host.
///
/// Zero means "unset" for `host_port`; `container_port` is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub listen_address: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub host_port: u16,
    #[serde(default)]
    pub container_port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
}

fn is_zero(port: &u16) -> bool {
    *port == 0
}

impl PortMapping {
    /// Create a mapping for a container port.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingContainerPort`] if `container_port` is zero.
    pub fn try_new(container_port: u16) -> Result<Self, DomainError> {
        if container_port == 0 {
            return Err(DomainError::MissingContainerPort);
        }
        Ok(Self {
            listen_address: String::new(),
            host_port: 0,
            container_port,
            protocol: String::new(),
        })
    }

    /// Same port on host and container over TCP.
    pub fn tcp(port: u16) -> Result<Self, DomainError> {
        Ok(Self::try_new(port)?.with_host_port(port).with_protocol("tcp"))
    }

    #[must_use]
    pub fn with_host_port(mut self, port: u16) -> Self {
        self.host_port = port;
        self
    }

    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    #[must_use]
    pub fn with_listen_address(mut self, address: impl Into<String>) -> Self {
        self.listen_address = address.into();
        self
    }

    /// Publish specification in `[address:][host:]container[/protocol]` form.
    pub fn publish_spec(&self) -> Result<String, DomainError> {
        if self.container_port == 0 {
            return Err(DomainError::MissingContainerPort);
        }

        let mut spec = String::new();
        if !self.listen_address.is_empty() {
            spec.push_str(&self.listen_address);
            spec.push(':');
        }
        if self.host_port != 0 {
            spec.push_str(&self.host_port.to_string());
            spec.push(':');
        }
        spec.push_str(&self.container_port.to_string());
        if !self.protocol.is_empty() {
            spec.push('/');
            spec.push_str(&self.protocol);
        }
        Ok(spec)
    }
}

/// Volume attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

/// Network shared by every node in a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub driver: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gateway: String,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl Network {
    /// The default network for a cluster.
    #[must_use]
    pub fn for_cluster(cluster: &str) -> Self {
        Self {
            name: identity::network_name(cluster),
            ..Self::default()
        }
    }
}

/// One containerised agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub role: Role,
    pub image: Image,
    pub network: String,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub environment: Labels,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortMapping>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<String>,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl Node {
    /// Create a node with no ports, volumes, devices or labels.
    pub fn new(
        identity: &NodeIdentity,
        kind: NodeKind,
        role: Role,
        image: Image,
        network: &str,
    ) -> Self {
        Self {
            name: identity.to_string(),
            kind,
            role,
            image,
            network: network.to_string(),
            environment: Labels::new(),
            ports: Vec::new(),
            volumes: Vec::new(),
            devices: Vec::new(),
            labels: Labels::new(),
        }
    }

    #[must_use]
    pub const fn is_client(&self) -> bool {
        matches!(self.role, Role::Client)
    }

    /// Parse the node's name back into its identity.
    pub fn identity(&self) -> Result<NodeIdentity, DomainError> {
        NodeIdentity::parse(&self.name)
    }

    /// A copy of this node with `labels` merged over its own.
    #[must_use]
    pub fn with_labels(&self, labels: &Labels) -> Self {
        let mut node = self.clone();
        node.labels
            .extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
        node
    }
}

/// Desired state of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub version: String,
}

impl Cluster {
    /// Labels stamped on every runtime resource created for this cluster.
    #[must_use]
    pub fn ownership_labels(&self) -> Labels {
        Labels::from([
            (CLUSTER_LABEL.to_string(), self.name.clone()),
            (VERSION_LABEL.to_string(), self.version.clone()),
        ])
    }

    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    #[must_use]
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    pub fn client_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_client())
    }

    #[must_use]
    pub fn count_client_nodes(&self) -> usize {
        self.client_nodes().count()
    }

    /// Highest ordinal among client nodes, 0 when there are none.
    #[must_use]
    pub fn max_client_ordinal(&self) -> u16 {
        self.client_nodes()
            .filter_map(|n| n.identity().ok())
            .map(|id| id.ordinal())
            .max()
            .unwrap_or(0)
    }

    /// Check every structural invariant of the model.
    pub fn validate(&self) -> Result<(), DomainError> {
        identity::validate_cluster_name(&self.name)?;

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(DomainError::DuplicateNode {
                    name: node.name.clone(),
                });
            }
            if node.network != self.network.name {
                return Err(DomainError::NetworkMismatch {
                    node: node.name.clone(),
                    expected: self.network.name.clone(),
                    actual: node.network.clone(),
                });
            }
            if node.image.name.is_empty() {
                return Err(DomainError::MissingImage {
                    node: node.name.clone(),
                });
            }
            for port in &node.ports {
                port.publish_spec()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, role: Role) -> Node {
        Node {
            name: name.to_string(),
            kind: NodeKind::Nomad,
            role,
            image: Image::new("docker.io/stenh0use/hind.nomad", "0.4.0"),
            network: "hind.demo".to_string(),
            environment: Labels::new(),
            ports: Vec::new(),
            volumes: Vec::new(),
            devices: Vec::new(),
            labels: Labels::new(),
        }
    }

    fn cluster(nodes: Vec<Node>) -> Cluster {
        Cluster {
            name: "demo".to_string(),
            nodes,
            network: Network::for_cluster("demo"),
            version: "0.4.0".to_string(),
        }
    }

    #[test]
    fn image_reference_prefers_digest() {
        let mut image = Image::new("repo/app", "1.0");
        assert_eq!(image.reference(), "repo/app:1.0");

        image.digest = "sha256:abc".to_string();
        assert_eq!(image.reference(), "repo/app@sha256:abc");

        let bare = Image::new("repo/app", "");
        assert_eq!(bare.reference(), "repo/app");
    }

    #[test]
    fn port_mapping_requires_container_port() {
        assert_eq!(PortMapping::try_new(0), Err(DomainError::MissingContainerPort));

        let port = PortMapping::try_new(4646).unwrap();
        assert_eq!(port.publish_spec().unwrap(), "4646");

        let port = PortMapping::tcp(8500).unwrap().with_listen_address("127.0.0.1");
        assert_eq!(port.publish_spec().unwrap(), "127.0.0.1:8500:8500/tcp");
    }

    #[test]
    fn hand_built_port_without_container_port_is_rejected() {
        let port = PortMapping {
            listen_address: String::new(),
            host_port: 8080,
            container_port: 0,
            protocol: "tcp".to_string(),
        };
        assert_eq!(port.publish_spec(), Err(DomainError::MissingContainerPort));
    }

    #[test]
    fn client_queries() {
        let cluster = cluster(vec![
            node("hind.demo.nomad.01", Role::Server),
            node("hind.demo.client.01", Role::Client),
            node("hind.demo.client.04", Role::Client),
        ]);

        assert_eq!(cluster.count_client_nodes(), 2);
        assert_eq!(cluster.max_client_ordinal(), 4);
        assert!(cluster.node("hind.demo.client.04").is_some());
        assert!(cluster.node("hind.demo.client.02").is_none());
    }

    #[test]
    fn validate_catches_duplicates_and_foreign_networks() {
        let dup = cluster(vec![
            node("hind.demo.client.01", Role::Client),
            node("hind.demo.client.01", Role::Client),
        ]);
        assert!(matches!(dup.validate(), Err(DomainError::DuplicateNode { .. })));

        let mut stray = node("hind.demo.client.01", Role::Client);
        stray.network = "bridge".to_string();
        let foreign = cluster(vec![stray]);
        assert!(matches!(
            foreign.validate(),
            Err(DomainError::NetworkMismatch { .. })
        ));
    }

    #[test]
    fn with_labels_merges_over_existing() {
        let mut base = node("hind.demo.client.01", Role::Client);
        base.labels.insert("team".into(), "infra".into());
        base.labels.insert(CLUSTER_LABEL.into(), "stale".into());

        let labelled = base.with_labels(&cluster(vec![]).ownership_labels());

        assert_eq!(labelled.labels["team"], "infra");
        assert_eq!(labelled.labels[CLUSTER_LABEL], "demo");
        assert_eq!(labelled.labels[VERSION_LABEL], "0.4.0");
    }

    #[test]
    fn json_uses_camel_case_and_skips_empty_fields() {
        let mut n = node("hind.demo.consul.01", Role::Server);
        n.ports.push(PortMapping::tcp(8500).unwrap());
        let json = serde_json::to_value(&n).unwrap();

        assert_eq!(json["ports"][0]["containerPort"], 8500);
        assert_eq!(json["ports"][0]["hostPort"], 8500);
        assert!(json.get("volumes").is_none());
        assert_eq!(json["role"], "server");
    }
}
