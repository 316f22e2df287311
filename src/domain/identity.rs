//! Node naming scheme.
//!
//! A node name is the idempotency key that correlates a configured node with
//! the container observed in the runtime, so its format is versioned. Scheme
//! version 1 renders `hind.<cluster>.<segment>.<NN>` where the ordinal is at
//! least two digits and starts at 1.

use std::fmt;
use std::str::FromStr;

use super::cluster::{NodeKind, Role};
use super::error::DomainError;

/// Version of the node naming scheme rendered by [`NodeIdentity`].
pub const NAMING_SCHEME_VERSION: u32 = 1;

/// Prefix shared by every resource this tool creates.
pub const NAMESPACE: &str = "hind";

/// Segment used for client-role nodes regardless of kind.
pub const CLIENT_SEGMENT: &str = "client";

/// Validate a cluster name for embedding into resource names.
///
/// Names must be non-empty ASCII alphanumerics, `-` or `_`, starting with an
/// alphanumeric character.
pub fn validate_cluster_name(name: &str) -> Result<(), DomainError> {
    let Some(first) = name.chars().next() else {
        return Err(DomainError::EmptyClusterName);
    };
    if !first.is_ascii_alphanumeric() {
        return Err(DomainError::InvalidClusterName {
            name: name.to_string(),
            reason: "must start with a letter or digit",
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::InvalidClusterName {
            name: name.to_string(),
            reason: "only letters, digits, '-' and '_' are allowed",
        });
    }
    Ok(())
}

/// Name of the network owned by a cluster.
#[must_use]
pub fn network_name(cluster: &str) -> String {
    format!("{NAMESPACE}.{cluster}")
}

/// Structured node name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeIdentity {
    cluster: String,
    segment: String,
    ordinal: u16,
}

impl NodeIdentity {
    /// Create an identity, validating every component.
    pub fn new(
        cluster: impl Into<String>,
        segment: impl Into<String>,
        ordinal: u16,
    ) -> Result<Self, DomainError> {
        let cluster = cluster.into();
        let segment = segment.into();
        validate_cluster_name(&cluster)?;

        if segment.is_empty() || segment.contains('.') {
            return Err(DomainError::InvalidNodeName {
                name: format!("{NAMESPACE}.{cluster}.{segment}.{ordinal:02}"),
                reason: "segment must be non-empty and contain no '.'",
            });
        }
        if ordinal == 0 {
            return Err(DomainError::InvalidNodeName {
                name: format!("{NAMESPACE}.{cluster}.{segment}.00"),
                reason: "ordinals start at 1",
            });
        }

        Ok(Self {
            cluster,
            segment,
            ordinal,
        })
    }

    /// Identity for a node of the given kind and role.
    pub fn for_node(
        cluster: impl Into<String>,
        kind: NodeKind,
        role: Role,
        ordinal: u16,
    ) -> Result<Self, DomainError> {
        Self::new(cluster, Self::segment_for(kind, role), ordinal)
    }

    /// Segment used for a kind/role pair.
    #[must_use]
    pub const fn segment_for(kind: NodeKind, role: Role) -> &'static str {
        match role {
            Role::Client => CLIENT_SEGMENT,
            Role::Server => kind.as_str(),
        }
    }

    /// Parse a node name rendered by this scheme.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let invalid = |reason| DomainError::InvalidNodeName {
            name: name.to_string(),
            reason,
        };

        let parts: Vec<&str> = name.split('.').collect();
        let [namespace, cluster, segment, ordinal] = parts.as_slice() else {
            return Err(invalid("expected four dot-separated parts"));
        };
        if *namespace != NAMESPACE {
            return Err(invalid("missing 'hind' prefix"));
        }
        if ordinal.len() < 2 || !ordinal.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("ordinal must be at least two digits"));
        }
        let ordinal = ordinal
            .parse::<u16>()
            .map_err(|_| invalid("ordinal out of range"))?;

        Self::new(*cluster, *segment, ordinal)
    }

    #[must_use]
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    #[must_use]
    pub const fn ordinal(&self) -> u16 {
        self.ordinal
    }

    #[must_use]
    pub fn is_client(&self) -> bool {
        self.segment == CLIENT_SEGMENT
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NAMESPACE}.{}.{}.{:02}",
            self.cluster, self.segment, self.ordinal
        )
    }
}

impl FromStr for NodeIdentity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_two_digit_ordinals() {
        let id = NodeIdentity::for_node("demo", NodeKind::Consul, Role::Server, 1).unwrap();
        assert_eq!(id.to_string(), "hind.demo.consul.01");

        let id = NodeIdentity::for_node("demo", NodeKind::Nomad, Role::Client, 12).unwrap();
        assert_eq!(id.to_string(), "hind.demo.client.12");

        let id = NodeIdentity::new("demo", "client", 100).unwrap();
        assert_eq!(id.to_string(), "hind.demo.client.100");
    }

    #[test]
    fn parse_reads_back_rendered_names() {
        let id = NodeIdentity::parse("hind.dev-1.client.07").unwrap();
        assert_eq!(id.cluster(), "dev-1");
        assert_eq!(id.segment(), "client");
        assert_eq!(id.ordinal(), 7);
        assert!(id.is_client());
        assert_eq!(id.to_string(), "hind.dev-1.client.07");
    }

    #[test]
    fn parse_rejects_foreign_names() {
        for name in [
            "",
            "hind.demo.client",
            "other.demo.client.01",
            "hind.demo.client.1",
            "hind.demo.client.00",
            "hind.demo.client.xx",
            "hind..client.01",
            "hind.demo.client.01.extra",
        ] {
            assert!(NodeIdentity::parse(name).is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn cluster_names_are_restricted() {
        assert!(validate_cluster_name("default").is_ok());
        assert!(validate_cluster_name("team_a-2").is_ok());
        assert_eq!(validate_cluster_name(""), Err(DomainError::EmptyClusterName));
        assert!(validate_cluster_name("-leading").is_err());
        assert!(validate_cluster_name("has.dot").is_err());
        assert!(validate_cluster_name("has space").is_err());
    }

    #[test]
    fn network_name_is_namespaced() {
        assert_eq!(network_name("demo"), "hind.demo");
    }
}
