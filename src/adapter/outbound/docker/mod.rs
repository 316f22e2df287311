//! Docker CLI runtime backend.
//!
//! Drives the `docker` binary through `tokio::process`. Each port method maps
//! onto one CLI invocation; failures carry the operation, the resource name
//! and the CLI's stderr.

mod container;
mod network;
mod parse;

use std::process::Output;

use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::port::Runtime;

/// Binary used when none is configured.
pub const DEFAULT_BINARY: &str = "docker";

/// Provider name reported by [`Runtime::provider`].
pub const PROVIDER: &str = "dockercli";

/// Go template that prints a whole inspect result as JSON.
const INSPECT_FORMAT: &str = "{{ . | json }}";

/// Go template that prints each `ls` row as one JSON line.
const LIST_FORMAT: &str = "{{ json . }}";

#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    async fn exec(
        &self,
        operation: &'static str,
        resource: &str,
        args: &[String],
    ) -> Result<Output> {
        debug!(binary = %self.binary, args = %args.join(" "), "Running docker command");
        Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                let message = format!("could not run {}: {e}", self.binary);
                Error::backend(operation, resource, message)
            })
    }

    /// Run a command that must succeed, returning trimmed stdout.
    async fn run(
        &self,
        operation: &'static str,
        resource: &str,
        args: Vec<String>,
    ) -> Result<String> {
        let output = self.exec(operation, resource, &args).await?;
        if !output.status.success() {
            return Err(failure(operation, resource, &output));
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        trace!(operation, resource, %stdout, "docker command succeeded");
        Ok(stdout)
    }

    /// Run an inspect command. `None` when the resource does not exist.
    async fn inspect(
        &self,
        operation: &'static str,
        resource: &str,
        args: Vec<String>,
    ) -> Result<Option<String>> {
        let output = self.exec(operation, resource, &args).await?;
        if output.status.success() {
            return Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()));
        }
        if output.status.code() == Some(1) && is_missing(&String::from_utf8_lossy(&output.stderr)) {
            return Ok(None);
        }
        Err(failure(operation, resource, &output))
    }
}

impl Runtime for DockerCli {
    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

fn is_missing(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.is_empty() || stderr.contains("no such") || stderr.contains("not found")
}

fn failure(operation: &'static str, resource: &str, output: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let message = if stderr.is_empty() {
        match output.status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    } else {
        stderr
    };
    Error::backend(operation, resource, message)
}

fn filter_args(filters: &[String]) -> Vec<String> {
    filters
        .iter()
        .flat_map(|f| ["--filter".to_string(), f.clone()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_messages() {
        assert!(is_missing("Error: No such container: hind.demo.consul.01"));
        assert!(is_missing("Error response from daemon: network hind.demo not found"));
        assert!(is_missing(""));
        assert!(!is_missing("Cannot connect to the Docker daemon at unix:///var/run/docker.sock"));
    }

    #[test]
    fn filters_expand_to_flags() {
        let args = filter_args(&["label=hind.cluster=demo".to_string()]);
        assert_eq!(args, vec!["--filter", "label=hind.cluster=demo"]);
    }

    #[tokio::test]
    async fn missing_binary_is_a_backend_error() {
        let cli = DockerCli::new("/nonexistent/docker-binary");
        let err = cli
            .run("list containers", "all", vec!["ps".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Backend { operation: "list containers", .. }));
    }
}
