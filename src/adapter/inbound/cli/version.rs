//! Handler for the `version` command.

use serde_json::json;

use super::output;
use crate::domain::{release, NAMING_SCHEME_VERSION};

/// Print the binary version and the packages of the latest release.
pub fn execute() {
    let latest = release::latest();

    if output::is_json() {
        let packages: serde_json::Map<String, serde_json::Value> = latest
            .packages()
            .iter()
            .map(|(name, version)| ((*name).to_string(), json!(version)))
            .collect();
        output::json_output(json!({
            "command": "version",
            "version": env!("CARGO_PKG_VERSION"),
            "naming_scheme": NAMING_SCHEME_VERSION,
            "releases": release::list(),
            "packages": packages,
        }));
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Releases", release::list().join(", "));
    output::field("Naming", format!("v{NAMING_SCHEME_VERSION}"));
    output::section(&format!("Release {}", latest.hind));
    for (name, version) in latest.packages() {
        output::field(name, version);
    }
}
