//! Default cluster topology.
//!
//! Synthesizes the node list for a new cluster: consul servers first, then
//! nomad servers, nomad clients and vault servers. Every agent other than the
//! consul servers joins the first consul server.

use super::cluster::{Cluster, Image, Labels, Network, Node, NodeKind, PortMapping, Role};
use super::error::DomainError;
use super::identity::NodeIdentity;
use super::release::ImageKind;

pub const CONSUL_UI_PORT: u16 = 8500;
pub const NOMAD_UI_PORT: u16 = 4646;
pub const VAULT_UI_PORT: u16 = 8200;

const FUSE_DEVICE: &str = "/dev/fuse";

/// Node counts per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub consul_servers: u16,
    pub nomad_servers: u16,
    pub nomad_clients: u16,
    pub vault_servers: u16,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            consul_servers: 1,
            nomad_servers: 1,
            nomad_clients: 1,
            vault_servers: 1,
        }
    }
}

impl Topology {
    #[must_use]
    pub const fn with_clients(mut self, clients: u16) -> Self {
        self.nomad_clients = clients;
        self
    }

    /// Build the cluster model for `name` with images tagged `version`.
    pub fn build(&self, name: &str, version: &str) -> Result<Cluster, DomainError> {
        let network = Network::for_cluster(name);
        let mut nodes = Vec::new();

        for ordinal in 1..=self.consul_servers {
            nodes.push(server_node(name, &network.name, NodeKind::Consul, ordinal, version)?);
        }
        for ordinal in 1..=self.nomad_servers {
            nodes.push(server_node(name, &network.name, NodeKind::Nomad, ordinal, version)?);
        }
        for ordinal in 1..=self.nomad_clients {
            nodes.push(client_node(name, &network.name, ordinal, version)?);
        }
        for ordinal in 1..=self.vault_servers {
            nodes.push(server_node(name, &network.name, NodeKind::Vault, ordinal, version)?);
        }

        let cluster = Cluster {
            name: name.to_string(),
            nodes,
            network,
            version: version.to_string(),
        };
        cluster.validate()?;
        Ok(cluster)
    }
}

/// Name of the consul server every other agent joins.
pub fn consul_server_address(cluster: &str) -> Result<String, DomainError> {
    Ok(NodeIdentity::for_node(cluster, NodeKind::Consul, Role::Server, 1)?.to_string())
}

fn consul_client_env(cluster: &str) -> Result<Labels, DomainError> {
    Ok(Labels::from([
        ("CONSUL_AGENT_MODE".to_string(), "client".to_string()),
        (
            "CONSUL_SERVER_ADDRESS".to_string(),
            consul_server_address(cluster)?,
        ),
    ]))
}

fn server_node(
    cluster: &str,
    network: &str,
    kind: NodeKind,
    ordinal: u16,
    version: &str,
) -> Result<Node, DomainError> {
    let identity = NodeIdentity::for_node(cluster, kind, Role::Server, ordinal)?;
    let (image_kind, ui_port) = match kind {
        NodeKind::Consul => (ImageKind::Consul, CONSUL_UI_PORT),
        NodeKind::Nomad => (ImageKind::Nomad, NOMAD_UI_PORT),
        NodeKind::Vault => (ImageKind::Vault, VAULT_UI_PORT),
    };
    let mut node = Node::new(
        &identity,
        kind,
        Role::Server,
        Image::new(image_kind.image_name(), version),
        network,
    );

    node.environment = match kind {
        NodeKind::Consul => Labels::from([("CONSUL_AGENT_MODE".to_string(), "server".to_string())]),
        NodeKind::Nomad => {
            let mut env = consul_client_env(cluster)?;
            env.insert("NOMAD_AGENT_MODE".to_string(), "server".to_string());
            env
        }
        NodeKind::Vault => consul_client_env(cluster)?,
    };

    // Only the first instance publishes its UI port to avoid host collisions.
    if ordinal == 1 {
        node.ports.push(PortMapping::tcp(ui_port)?);
    }
    Ok(node)
}

/// A nomad client node at `ordinal`, attached to `network`.
pub fn client_node(
    cluster: &str,
    network: &str,
    ordinal: u16,
    version: &str,
) -> Result<Node, DomainError> {
    let identity = NodeIdentity::for_node(cluster, NodeKind::Nomad, Role::Client, ordinal)?;
    let mut node = Node::new(
        &identity,
        NodeKind::Nomad,
        Role::Client,
        Image::new(ImageKind::NomadClient.image_name(), version),
        network,
    );

    let mut env = consul_client_env(cluster)?;
    env.insert("NOMAD_AGENT_MODE".to_string(), "client".to_string());
    node.environment = env;
    node.devices.push(FUSE_DEVICE.to_string());
    Ok(node)
}
