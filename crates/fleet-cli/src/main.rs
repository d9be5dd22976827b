use clap::{Parser, Subcommand, ValueEnum};
use fleet_core::AllocationPolicy;

mod commands;

#[derive(Parser)]
#[command(
    name = "fleet",
    about = "fleetgrid — capacity-aware task dispatch for a worker fleet",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one health-check pass and dispatch the configured task batch.
    ///
    /// Without --config, a built-in three-node fleet is used.
    Run {
        /// Path to fleet.toml
        #[arg(short, long)]
        config: Option<String>,
        /// Override the allocation policy (best_fit, round_robin)
        #[arg(short, long)]
        policy: Option<AllocationPolicy>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Run one health-check pass and print each node's status
    Health {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Write a scaffold fleet.toml
    Init {
        #[arg(short, long, default_value = ".")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    match cli.command {
        Commands::Run {
            config,
            policy,
            format,
        } => commands::run::run(config.as_deref(), policy, &format),
        Commands::Health { config } => commands::health::health(config.as_deref()),
        Commands::Init { path } => commands::init::init(&path),
    }
}
