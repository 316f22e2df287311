//! Release catalog.
//!
//! Each release pins the package versions baked into the node images and the
//! image tag used when a new cluster is synthesized.

use std::fmt;

/// Registry prefix of every node image.
pub const IMAGE_REPOSITORY: &str = "docker.io/stenh0use";

/// Alias accepted wherever a release version is expected.
pub const LATEST_ALIAS: &str = "latest";

/// Package versions shipped together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub hind: &'static str,
    pub base: &'static str,
    pub consul: &'static str,
    pub nomad: &'static str,
    pub vault: &'static str,
    pub containerd: &'static str,
    pub docker_ce: &'static str,
    pub cni_plugins: &'static str,
    pub cilium: &'static str,
}

impl Release {
    /// Version of a package by name.
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&'static str> {
        let version = match name {
            "hind" => self.hind,
            "base" => self.base,
            "consul" => self.consul,
            "nomad" => self.nomad,
            "vault" => self.vault,
            "containerd" => self.containerd,
            "docker-ce" => self.docker_ce,
            "cni-plugins" => self.cni_plugins,
            "cilium" => self.cilium,
            _ => return None,
        };
        Some(version)
    }

    /// All packages as `(name, version)` pairs in display order.
    #[must_use]
    pub fn packages(&self) -> [(&'static str, &'static str); 9] {
        [
            ("hind", self.hind),
            ("base", self.base),
            ("consul", self.consul),
            ("nomad", self.nomad),
            ("vault", self.vault),
            ("containerd", self.containerd),
            ("docker-ce", self.docker_ce),
            ("cni-plugins", self.cni_plugins),
            ("cilium", self.cilium),
        ]
    }

    /// Image for a node kind at this release.
    #[must_use]
    pub fn image(&self, kind: ImageKind) -> super::cluster::Image {
        super::cluster::Image::new(kind.image_name(), self.hind)
    }
}

static RELEASES: [Release; 2] = [
    Release {
        hind: "0.4.0",
        base: "bullseye-slim",
        consul: "1.22.0",
        nomad: "1.10.5",
        vault: "1.21.0",
        containerd: "1.7.27-1",
        docker_ce: "28.5.1-1",
        cni_plugins: "1.3.0",
        cilium: "1.13.9",
    },
    Release {
        hind: "0.3.0",
        base: "bullseye-slim",
        consul: "1.18.1",
        nomad: "1.7.6",
        vault: "1.15.4",
        containerd: "1.6.31-1",
        docker_ce: "26.0.1-1",
        cni_plugins: "1.3.0",
        cilium: "1.13.9",
    },
];

/// The newest release.
#[must_use]
pub fn latest() -> Release {
    RELEASES[0]
}

/// Look up a release. Empty and `latest` resolve to [`latest`].
#[must_use]
pub fn get(version: &str) -> Option<Release> {
    if version.is_empty() || version == LATEST_ALIAS {
        return Some(latest());
    }
    RELEASES.iter().find(|r| r.hind == version).copied()
}

/// Known release versions, newest first.
#[must_use]
pub fn list() -> Vec<&'static str> {
    RELEASES.iter().map(|r| r.hind).collect()
}

/// Image flavour built for each node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Consul,
    Nomad,
    NomadClient,
    Vault,
}

impl ImageKind {
    pub const ALL: [ImageKind; 4] = [Self::Consul, Self::Nomad, Self::NomadClient, Self::Vault];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consul => "consul",
            Self::Nomad => "nomad",
            Self::NomadClient => "nomad-client",
            Self::Vault => "vault",
        }
    }

    /// Fully qualified image name without tag.
    #[must_use]
    pub fn image_name(self) -> String {
        format!("{IMAGE_REPOSITORY}/hind.{}", self.as_str())
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_is_newest_entry() {
        assert_eq!(latest().hind, "0.4.0");
        assert_eq!(get("latest"), Some(latest()));
        assert_eq!(get(""), Some(latest()));
        assert_eq!(list(), vec!["0.4.0", "0.3.0"]);
    }

    #[test]
    fn older_release_pins_older_packages() {
        let release = get("0.3.0").unwrap();
        assert_eq!(release.package("nomad"), Some("1.7.6"));
        assert_eq!(release.package("docker-ce"), Some("26.0.1-1"));
        assert_eq!(release.package("kubernetes"), None);
        assert!(get("9.9.9").is_none());
    }

    #[test]
    fn image_names_follow_kind() {
        let image = latest().image(ImageKind::NomadClient);
        assert_eq!(image.name, "docker.io/stenh0use/hind.nomad-client");
        assert_eq!(image.reference(), "docker.io/stenh0use/hind.nomad-client:0.4.0");
    }
}
