use std::path::PathBuf;

use clap::Parser;
use popdens_plugin_api::ServerStatus;
use popdens_rules::PopulationDensityPlugin;
use popdens_server::config::ServerConfig;
use popdens_server::error::ServerError;
use popdens_server::host::HostState;
use popdens_server::plugin_manager::PluginManager;
use popdens_server::replay::{self, Replayer};
use tokio::io::BufReader;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "popdens-server")]
#[command(about = "Replay world events through the region rules")]
struct Args {
    /// Events file, one JSON event per line. Reads stdin when omitted.
    events: Option<PathBuf>,

    /// Server config file
    #[arg(long, default_value = "server.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match ServerConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.config.display());
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "popdens-server v{} starting: {}",
        env!("CARGO_PKG_VERSION"),
        config.server.name
    );

    let host = match HostState::from_config(&config) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to build worlds: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Regions: managed world '{}', size {}, open ({}, {})",
        config.regions.managed_world,
        config.regions.size,
        config.regions.open_x,
        config.regions.open_z
    );

    let mut manager = PluginManager::new(&config.server.plugin_dir);
    manager.register(Box::new(PopulationDensityPlugin::new()));
    manager.load_configs();

    let status = ServerStatus {
        grinders_stopped: config.load.grinders_stopped,
    };
    let mut replayer = Replayer::new(host, manager, status);
    replayer.enable_plugins();

    let result = tokio::select! {
        result = replay_input(&mut replayer, args.events) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    let (_, stats) = replayer.finish();
    info!("Replay finished: {stats}");

    if let Err(e) = result {
        error!("Replay aborted: {e}");
        std::process::exit(1);
    }
}

async fn replay_input(
    replayer: &mut Replayer,
    events: Option<PathBuf>,
) -> Result<(), ServerError> {
    match events {
        Some(path) => {
            info!("Replaying {}", path.display());
            let file = tokio::fs::File::open(&path).await?;
            replay::run(replayer, BufReader::new(file)).await
        }
        None => {
            info!("Replaying events from stdin");
            replay::run(replayer, BufReader::new(tokio::io::stdin())).await
        }
    }
}
