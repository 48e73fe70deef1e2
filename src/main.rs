//! sdcp - Command-line control for Sony projectors
//!
//! Sends single SDCP requests and prints the result.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use sdcp_client::{Config, Connector, Projector, SimulatedTransport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sdcp")]
#[command(about = "Control Sony projectors over SDCP")]
#[command(version)]
struct Cli {
    /// Projector host name or IP address
    #[arg(long)]
    host: Option<String>,

    /// SDCP port
    #[arg(short, long)]
    port: Option<u16>,

    /// Community string (4 ASCII characters)
    #[arg(short, long)]
    community: Option<String>,

    /// Projector model (e.g. VPL-VW520); sets capabilities and value names
    #[arg(short, long)]
    model: Option<String>,

    /// YAML config file
    #[arg(long, env = "SDCP_CONFIG")]
    config: Option<PathBuf>,

    /// Talk to an in-memory projector instead of the network
    #[arg(long)]
    simulate: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known items
    Items,

    /// List known projector models
    Models,

    /// Read an item
    Get {
        /// Item name (e.g. "contrast", "lamp-use-time") or 4-digit hex code
        item: String,
    },

    /// Write an item
    Set {
        /// Item name or 4-digit hex code
        item: String,

        /// Data as hex (e.g. 0050), or a value name such as "HDMI1" when the
        /// model is known
        data: String,
    },

    /// Switch power or read the power status
    Power {
        #[arg(value_enum)]
        action: PowerAction,
    },

    /// Send an infrared remote code
    Ir {
        /// IR item name or hex code
        item: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PowerAction {
    On,
    Off,
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Catalog listings need no projector
    match cli.command {
        Commands::Items => {
            println!("{}", commands::list_items(cli.json)?);
            return Ok(());
        }
        Commands::Models => {
            println!("{}", commands::list_models(cli.json)?);
            return Ok(());
        }
        _ => {}
    }

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_file(path).map_err(|e| {
                eprintln!("{}: {}", "Config error".red(), e);
                e
            })?;
            config.apply_env_overrides();
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        None => Config::load()?,
    };

    if let Some(host) = cli.host {
        config.connection.host = host;
    }
    if let Some(port) = cli.port {
        config.connection.port = port;
    }
    if let Some(community) = cli.community {
        config.connection.community = community;
    }
    if let Some(model) = cli.model {
        config.connection.model = Some(model);
        config.resolve_model().map_err(|e| {
            eprintln!("{}: {}", "Config error".red(), e);
            e
        })?;
    }

    let connector = if cli.simulate {
        Connector::simulated(SimulatedTransport::new(), &config.connection)
    } else {
        Connector::tcp(&config.connection)
    };
    let projector = Projector::new(connector, config.capabilities);

    let result = commands::execute(&projector, cli.command, cli.json).await;
    projector.connector().close().await;

    match result {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }

    Ok(())
}
