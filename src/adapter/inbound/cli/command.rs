//! Command-line interface definitions.
//!
//! Defines the CLI structure for hind using `clap`. Every lifecycle command
//! takes an optional cluster name; when omitted the active cluster is used,
//! falling back to `default`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use super::paths;

/// Nomad, consul and vault clusters in docker containers
#[derive(Parser, Debug)]
#[command(name = "hind")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Settings file
    #[arg(long, global = true, default_value_os_t = paths::default_settings())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the hind CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or resume a cluster
    Start(StartArgs),

    /// Stop the nodes of a cluster
    Stop(LifecycleArgs),

    /// Remove a cluster, its network and its configuration
    #[command(visible_alias = "delete")]
    Rm(LifecycleArgs),

    /// Show the nodes of a cluster
    Get(LifecycleArgs),

    /// List known clusters
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Change local preferences
    #[command(subcommand)]
    Set(SetCommand),

    /// Show version and release information
    Version,
}

/// Arguments for `hind start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Cluster name
    pub name: Option<String>,

    /// Release to deploy
    #[arg(long = "version", default_value = "latest")]
    pub release: String,

    /// Number of nomad client nodes
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub clients: Option<u16>,

    /// Give up after this long (e.g. 90s, 5m)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

/// Arguments shared by `stop`, `rm` and `get`.
#[derive(Args, Debug)]
pub struct LifecycleArgs {
    /// Cluster name
    pub name: Option<String>,

    /// Give up after this long (e.g. 30s, 2m)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

/// Arguments for `hind list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Give up after this long (e.g. 30s)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

/// Subcommands for `hind set`.
#[derive(Subcommand, Debug)]
pub enum SetCommand {
    /// Make a cluster the default for commands that take no name
    Profile {
        /// Cluster name
        name: String,
    },
}

/// Parse `300`, `30s`, `5m` or `1h` into a duration. Bare numbers are seconds.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);

    let amount: u64 = amount
        .parse()
        .map_err(|_| format!("invalid duration '{value}'"))?;
    let seconds = match unit {
        "" | "s" => amount,
        "m" => amount.saturating_mul(60),
        "h" => amount.saturating_mul(3600),
        other => return Err(format!("unknown duration unit '{other}', expected s, m or h")),
    };
    if seconds == 0 {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_factory_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "hind");
        assert!(cmd.get_version().is_some());
    }

    #[test]
    fn test_parse_verbose_and_json() {
        let cli = Cli::try_parse_from(["hind", "-vv", "--json", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(matches!(cli.color, ColorChoice::Auto));
    }

    #[test]
    fn test_start_defaults() {
        let cli = Cli::try_parse_from(["hind", "start"]).unwrap();
        let Commands::Start(args) = cli.command else {
            panic!("Expected Start command");
        };
        assert!(args.name.is_none());
        assert_eq!(args.release, "latest");
        assert!(args.clients.is_none());
        assert!(args.timeout.is_none());
    }

    #[test]
    fn test_start_with_options() {
        let cli = Cli::try_parse_from([
            "hind", "start", "demo", "--version", "0.3.0", "--clients", "3", "--timeout", "5m",
        ])
        .unwrap();
        let Commands::Start(args) = cli.command else {
            panic!("Expected Start command");
        };
        assert_eq!(args.name.as_deref(), Some("demo"));
        assert_eq!(args.release, "0.3.0");
        assert_eq!(args.clients, Some(3));
        assert_eq!(args.timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_start_rejects_zero_clients() {
        assert!(Cli::try_parse_from(["hind", "start", "--clients", "0"]).is_err());
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["hind", "delete", "demo"]).unwrap();
        assert!(matches!(cli.command, Commands::Rm(_)));
        let cli = Cli::try_parse_from(["hind", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_set_profile() {
        let cli = Cli::try_parse_from(["hind", "set", "profile", "demo"]).unwrap();
        let Commands::Set(SetCommand::Profile { name }) = cli.command else {
            panic!("Expected set profile");
        };
        assert_eq!(name, "demo");
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("300"), Ok(Duration::from_secs(300)));
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("0s").is_err());
    }
}
