use clap::{Parser, Subcommand};
use mista::channels::mista::SendAdapter;
use mista::channels::OutboundMessage;
use mista::urn::Urn;

#[derive(Parser)]
#[command(name = "mista")]
#[command(about = "Mista SMS channel CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config.json (never overwrites).
    Init {
        /// Config file path (default: MISTA_CONFIG_PATH or ~/.mista/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook gateway for all configured channels.
    Gateway {
        /// Config file path (default: MISTA_CONFIG_PATH or ~/.mista/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 15180)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send one message through a configured channel and print the send record as JSON.
    Send {
        /// Config file path (default: MISTA_CONFIG_PATH or ~/.mista/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Channel uuid from the config.
        #[arg(long, value_name = "UUID")]
        channel: String,

        /// Recipient: tel URN (tel:+256711223344) or a number local to the channel's country.
        #[arg(long, value_name = "URN")]
        to: String,

        /// Message text.
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("mista {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Gateway { config, port }) => {
            if let Err(e) = run_gateway(config, port).await {
                log::error!("gateway failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send {
            config,
            channel,
            to,
            text,
        }) => {
            if let Err(e) = run_send(config, channel, to, text).await {
                log::error!("send failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(mista::config::default_config_path);
    let dir = mista::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_gateway(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _path) = mista::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!("starting gateway on {}:{}", config.gateway.bind, config.gateway.port);
    mista::gateway::run_gateway(config).await
}

async fn run_send(
    config_path: Option<std::path::PathBuf>,
    channel_uuid: String,
    to: String,
    text: String,
) -> anyhow::Result<()> {
    let (config, path) = mista::config::load_config(config_path)?;
    let registry = mista::config::build_registry(&config);
    let channel = registry.get(&channel_uuid).ok_or_else(|| {
        let mut known = registry.ids();
        known.sort();
        anyhow::anyhow!(
            "channel {} not found in {} (configured: {})",
            channel_uuid,
            path.display(),
            if known.is_empty() { "none".to_string() } else { known.join(", ") }
        )
    })?;
    let urn = if to.trim_start().to_lowercase().starts_with("tel:") {
        Urn::parse(&to)?
    } else {
        channel.tel_urn(&to)?
    };
    let msg = OutboundMessage {
        id: uuid::Uuid::new_v4().to_string(),
        urn,
        text,
    };

    let adapter = SendAdapter::new(mista::config::build_http_client(&config)?);
    let result = adapter.send(&channel, &msg).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
