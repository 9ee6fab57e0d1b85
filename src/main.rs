use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use varicache::{config, server};

/// Flags that override values from the config file.
#[derive(clap::Args, Clone, Default)]
struct ServeArgs {
    /// Address to listen on (overrides `server.bind`)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Storage root directory (overrides `storage.root`)
    #[arg(long)]
    storage_root: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "varicache")]
#[command(about = "On-demand image variant cache")]
#[command(long_about = "\
On-demand image variant cache

Serves GET /<container>/<name>. If <name> is already stored it is returned
as-is. Otherwise dimension tokens are stripped from <name> to find the
original, which is resized, encoded as WebP, returned, and stored under
<name> for next time.

Naming convention:

  photo_w300_h200.webp   300x200, cropped to fill
  photo_h200_w300.webp   same
  photo_w300.webp        300 wide, height follows the aspect ratio
  photo_h200.webp        200 high, width follows the aspect ratio

Storage layout: <storage-root>/<container>/<name>

Logging is controlled with RUST_LOG (default: info,tower_http=warn).")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "varicache.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Load and validate the config, then print the effective values
    CheckConfig(ServeArgs),
    /// Print a stock varicache.toml with all options documented
    GenConfig,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(
    path: &std::path::Path,
    args: ServeArgs,
) -> Result<config::ServerConfig, config::ConfigError> {
    let mut config = config::ServerConfig::load(path)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(root) = args.storage_root {
        config.storage.root = root;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => {
            init_tracing();
            let config = load_config(&cli.config, args)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::run(&config))?;
        }
        Command::CheckConfig(args) => {
            let config = load_config(&cli.config, args)?;
            println!("==> Config OK: {}", cli.config.display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
