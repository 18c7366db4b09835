//! CLI for classifying Safe transactions.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use safe_txinfo_classifier::{
    Collaborators, FeatureFlags, InMemoryTokenRepository, NoHumanDescription, StakingDeployments,
    TransactionClassifier, TransactionInfo, TransactionRecord, UnavailableDecoder,
};
use safe_txinfo_telemetry::{init_logging, LogFormat, Metrics};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "safe-txinfo")]
#[command(about = "Describe Safe multisig and module transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify transaction records read from a JSON file
    Classify {
        /// Chain the transactions belong to
        #[arg(long, default_value = "1")]
        chain_id: String,

        /// JSON file with one transaction record or an array of records
        #[arg(long)]
        transaction: PathBuf,

        /// JSON array of known tokens on the chain
        #[arg(long)]
        tokens: Option<PathBuf>,

        /// JSON file with a `features` section (FF_* environment variables otherwise)
        #[arg(long)]
        features: Option<PathBuf>,

        /// JSON object mapping chain ids to official staking deployments
        #[arg(long)]
        staking_deployments: Option<PathBuf>,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,

        /// Log format (json or pretty)
        #[arg(long, default_value = "json")]
        log_format: String,

        /// Print Prometheus metrics to stderr when done
        #[arg(long, default_value = "false")]
        print_metrics: bool,
    },
    /// Validate feature flag configuration without classifying anything
    CheckConfig {
        /// JSON file with a `features` section (FF_* environment variables otherwise)
        #[arg(long)]
        features: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            chain_id,
            transaction,
            tokens,
            features,
            staking_deployments,
            log_level,
            log_format,
            print_metrics,
        } => {
            init_logging(log_level.as_deref(), log_format.parse()?)?;
            let flags = load_flags(features.as_deref())?;
            let classifier = build_classifier(
                flags,
                &chain_id,
                tokens.as_deref(),
                staking_deployments.as_deref(),
            )?;
            run_classify(&classifier, &chain_id, &transaction).await?;
            if print_metrics {
                eprintln!("{}", classifier.metrics().gather()?);
            }
        }
        Commands::CheckConfig { features } => {
            init_logging(None, LogFormat::Pretty)?;
            let flags = load_flags(features.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&flags)?);
        }
    }

    Ok(())
}

fn load_flags(features: Option<&Path>) -> anyhow::Result<FeatureFlags> {
    let flags = match features {
        Some(path) => FeatureFlags::from_json_file(path)?,
        None => FeatureFlags::from_env()?,
    };
    Ok(flags)
}

fn build_classifier(
    flags: FeatureFlags,
    chain_id: &str,
    tokens: Option<&Path>,
    staking_deployments: Option<&Path>,
) -> anyhow::Result<TransactionClassifier> {
    let tokens = match tokens {
        Some(path) => InMemoryTokenRepository::from_json_file(chain_id, path)?,
        None => {
            warn!("No token list given, token transfers will be described as custom transactions");
            InMemoryTokenRepository::new()
        }
    };
    let deployments = match staking_deployments {
        Some(path) => StakingDeployments::from_json_file(path)?,
        None => StakingDeployments::new(),
    };

    // No order backend is wired into the CLI: detected orders are logged
    // and described by the standard classifiers.
    let decoder = Arc::new(UnavailableDecoder::new(deployments));
    let collaborators = Collaborators {
        swap_orders: decoder.clone(),
        twap_orders: decoder.clone(),
        native_staking: decoder,
        tokens: Arc::new(tokens),
        human_description: Arc::new(NoHumanDescription),
    };

    let classifier = TransactionClassifier::new(flags, collaborators, Metrics::new()?);
    let flags = classifier.flags();
    info!(
        rich_fragments = flags.rich_fragments,
        swaps_decoding = flags.swaps_decoding,
        twaps_decoding = flags.twaps_decoding,
        native_staking_decoding = flags.native_staking_decoding,
        "Classifier ready"
    );
    Ok(classifier)
}

/// Records read from a file, remembering whether it held a batch.
struct Records {
    records: Vec<TransactionRecord>,
    is_batch: bool,
}

fn load_records(path: &Path) -> anyhow::Result<Records> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let records = match value {
        Value::Array(_) => Records {
            records: serde_json::from_value(value)?,
            is_batch: true,
        },
        _ => Records {
            records: vec![serde_json::from_value(value)?],
            is_batch: false,
        },
    };
    Ok(records)
}

async fn run_classify(
    classifier: &TransactionClassifier,
    chain_id: &str,
    path: &Path,
) -> anyhow::Result<()> {
    let Records { records, is_batch } = load_records(path)?;
    info!("Classifying {} transactions on chain {}", records.len(), chain_id);

    let mut results: Vec<TransactionInfo> = Vec::with_capacity(records.len());
    for record in &records {
        results.push(classifier.classify(chain_id, record).await?);
    }

    let output = if is_batch {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string_pretty(&results[0])?
    };
    println!("{}", output);
    Ok(())
}
