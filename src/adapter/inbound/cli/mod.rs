//! CLI module graph and command dispatch.

pub mod command;
pub mod context;
pub mod get;
pub mod list;
pub mod output;
pub mod paths;
pub mod remove;
pub mod set;
pub mod start;
pub mod stop;
pub mod version;

use tokio::sync::watch;
use tracing::{debug, info};

use self::command::{Cli, ColorChoice, Commands, SetCommand};
use self::context::CommandContext;
use self::output::OutputConfig;
use crate::error::Result;
use crate::infrastructure::config::Settings;

/// Run a parsed command line to completion.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let home = paths::home_dir();
    let settings = Settings::load(&cli.config)?;
    settings.logging.init(cli.verbose);
    debug!(config = %cli.config.display(), home = %home.display(), "Settings loaded");

    if matches!(cli.command, Commands::Version) {
        version::execute();
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    let ctx = CommandContext::from_settings(settings, home, shutdown_rx)?;

    match cli.command {
        Commands::Start(args) => {
            start::execute(
                &ctx,
                args.name.as_deref(),
                &args.release,
                args.clients,
                args.timeout,
            )
            .await
        }
        Commands::Stop(args) => stop::execute(&ctx, args.name.as_deref(), args.timeout).await,
        Commands::Rm(args) => remove::execute(&ctx, args.name.as_deref(), args.timeout).await,
        Commands::Get(args) => get::execute(&ctx, args.name.as_deref(), args.timeout).await,
        Commands::List(args) => list::execute(&ctx, args.timeout).await,
        Commands::Set(SetCommand::Profile { name }) => set::profile(&ctx, &name),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
