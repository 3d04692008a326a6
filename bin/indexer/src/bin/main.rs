use clap::{Parser, Subcommand};
use indexer::{
    config::Config,
    feed::LogFeed,
    metrics::{install_prometheus_exporter, Metrics},
    snapshot::Snapshot,
    Indexer,
};
use metadata::{ContractMetadataSource, MetadataResolver};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Reconcile ERC20 Transfer and Approval events into entity tables")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Follow the chain head
    Run,

    /// Index a fixed block range and exit
    Scan {
        #[arg(long)]
        from: u64,

        #[arg(long)]
        to: u64,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = Config::from_file(&cli.config)?;
    let chain = config.chain_config()?;

    info!(
        chain = %chain.name,
        chain_id = chain.chain_id,
        tokens = config.tokens.len(),
        strict = config.strict_balances,
        "Loaded config"
    );

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Serving metrics");
    }

    let provider = client::connect(&chain).await?;
    let resolver = MetadataResolver::new(ContractMetadataSource::new(provider.clone()))
        .with_call_timeout(config.metadata_timeout());
    let ledger_config = config.ledger_config(&chain);
    let metrics = Metrics::new();

    let snapshot = match &config.snapshot_path {
        Some(path) => Snapshot::load(path)?,
        None => None,
    };
    let mut indexer = match snapshot {
        Some(snapshot) => Indexer::resume(snapshot, resolver, ledger_config, metrics),
        None => Indexer::new(resolver, ledger_config, metrics),
    };
    if let Some(path) = &config.snapshot_path {
        indexer = indexer.with_snapshot_path(path.clone());
    }

    let feed = LogFeed::new(provider, config.tokens.clone(), config.chunk_size);

    match cli.command {
        Command::Run => {
            let from = indexer.next_block(config.start_block);
            info!(from, "Following chain head");

            tokio::select! {
                result = indexer.follow(&feed, config.start_block, config.poll_interval()) => result?,
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
            }
        }
        Command::Scan { from, to } => {
            let events = indexer.index_range(&feed, from, to).await?;
            info!(from, to, events, "Scan complete");
        }
    }

    Ok(())
}
