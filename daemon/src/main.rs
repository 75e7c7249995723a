//! datafutures: command-line client for publishing and revealing data futures.

mod prompt;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use datafutures_authorization::{ChallengeVerifier, KeypairSigner};
use datafutures_index::ListIssue;
use datafutures_service::{counters, CodecKind, FutureService, NewFuture, ServiceConfig};
use datafutures_store_lmdb::LmdbRecordStore;
use datafutures_types::{Category, FutureId, FutureRecord, OwnerAddress, SystemClock, Timestamp};
use datafutures_utils::{describe_expiry, LogFormat};

use crate::prompt::PromptSigner;

#[derive(Parser)]
#[command(name = "datafutures", about = "Publish and reveal data futures")]
struct Cli {
    /// Data directory for the record store.
    #[arg(long, env = "DATAFUTURES_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Store instance that reveal authorizations are scoped to.
    #[arg(long, env = "DATAFUTURES_CONTRACT_ADDRESS")]
    contract_address: Option<String>,

    /// Network id that reveal authorizations are scoped to.
    #[arg(long, env = "DATAFUTURES_CHAIN_ID")]
    chain_id: Option<u64>,

    /// Value codec: "marker" or "sealed".
    #[arg(long, env = "DATAFUTURES_CODEC", value_parser = parse_codec)]
    codec: Option<CodecKind>,

    /// Hex secret for the sealed codec.
    #[arg(long, env = "DATAFUTURES_CODEC_SECRET", hide_env_values = true)]
    codec_secret: Option<String>,

    /// Verify reveal signatures and the authorization window.
    #[arg(long, env = "DATAFUTURES_VERIFY_SIGNATURES")]
    verify_signatures: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "DATAFUTURES_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DATAFUTURES_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DATAFUTURES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// List all futures, newest first.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Publish a new future.
    Create {
        #[arg(long, env = "DATAFUTURES_OWNER")]
        owner: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Climate, Health, Finance, Tech or Other.
        #[arg(long, value_parser = parse_category, default_value = "Other")]
        category: Category,
        /// The value to protect.
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        /// Lifetime in days (0 = configured default).
        #[arg(long, default_value_t = 30)]
        expiry_days: u64,
    },
    /// Sign the session challenge and decode one future's value.
    Reveal {
        id: String,
        #[command(flatten)]
        key: SigningKeyArgs,
        /// Sign without asking.
        #[arg(long, short)]
        yes: bool,
        /// Only accept signatures from these public keys (hex). Implies
        /// signature verification.
        #[arg(long = "trusted-signer")]
        trusted_signers: Vec<String>,
    },
    /// Compare stored records with the index.
    Reconcile {
        /// Append unindexed records to the index.
        #[arg(long)]
        repair: bool,
    },
    /// Counts of active and expired futures per category.
    Stats,
    /// Generate a new signing key.
    Keygen,
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct SigningKeyArgs {
    /// File holding a hex-encoded 32-byte signing seed.
    #[arg(long)]
    key_file: Option<PathBuf>,
    /// Hex-encoded 32-byte signing seed.
    #[arg(long, env = "DATAFUTURES_SIGNING_SEED", hide_env_values = true)]
    seed_hex: Option<String>,
}

fn parse_codec(s: &str) -> Result<CodecKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "marker" => Ok(CodecKind::Marker),
        "sealed" => Ok(CodecKind::Sealed),
        other => Err(format!("unknown codec '{other}' (expected marker or sealed)")),
    }
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format '{other}' (expected human or json)")),
    }
}

/// Strict on the command line; stored documents use the lenient reading.
fn parse_category(s: &str) -> Result<Category, String> {
    Category::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| {
            let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
            format!("unknown category '{s}' (expected one of {})", names.join(", "))
        })
}

/// File settings first, then CLI flags and env vars on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            ServiceConfig::from_toml_file(&path)
                .with_context(|| format!("loading config file {path}"))?
        }
        None => ServiceConfig::default(),
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(address) = &cli.contract_address {
        config.contract_address = address.clone();
    }
    if let Some(chain_id) = cli.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(codec) = cli.codec {
        config.codec = codec;
    }
    if let Some(secret) = &cli.codec_secret {
        config.codec_secret = Some(secret.clone());
    }
    config.verify_signatures |= cli.verify_signatures;
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn load_signer(args: &SigningKeyArgs) -> anyhow::Result<KeypairSigner> {
    let seed_hex = match (&args.key_file, &args.seed_hex) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("reading key file {}", path.display()))?,
        (None, Some(hex)) => hex.clone(),
        (None, None) => bail!("a signing key is required (--key-file or --seed-hex)"),
    };
    let keypair = datafutures_crypto::keypair_from_hex_seed(seed_hex.trim())
        .context("parsing signing seed")?;
    Ok(KeypairSigner::new(keypair))
}

fn print_record(record: &FutureRecord, now: Timestamp) {
    let status = if record.is_active(now) { "active" } else { "expired" };
    println!(
        "{}  {:<8} {:<7} {}  {}  ({})",
        record.id,
        record.category.as_str(),
        status,
        record.owner,
        record.description,
        describe_expiry(record.expires_at, now),
    );
}

fn open_service(config: &ServiceConfig) -> anyhow::Result<FutureService<LmdbRecordStore>> {
    let store = LmdbRecordStore::open(&config.data_dir)
        .with_context(|| format!("opening record store at {}", config.data_dir.display()))?;
    let service = FutureService::from_config(store, config, Arc::new(SystemClock))?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        codec = service.codec().name(),
        chain_id = config.chain_id,
        "service ready"
    );
    Ok(service)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    datafutures_utils::init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::List { json } => {
            let service = open_service(&config)?;
            let listing = service.list_detailed().await;
            for issue in &listing.issues {
                match issue {
                    ListIssue::Index(e) => tracing::warn!(error = %e, "index unreadable"),
                    ListIssue::Dangling(id) => tracing::warn!(id = %id, "index entry has no record"),
                    ListIssue::Record { id, error } => {
                        tracing::warn!(id = %id, error = %error, "record unreadable")
                    }
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&listing.records)?);
            } else {
                let now = Timestamp::now();
                for record in &listing.records {
                    print_record(record, now);
                }
                if listing.records.is_empty() {
                    println!("no futures");
                }
            }
        }
        Command::Create {
            owner,
            description,
            category,
            value,
            expiry_days,
        } => {
            let service = open_service(&config)?;
            let record = service
                .create(NewFuture {
                    owner: OwnerAddress::new(owner),
                    description,
                    category,
                    value,
                    expiry_days,
                })
                .await?;
            if service.stats().get(counters::INDEX_APPEND_FAILURES) > 0 {
                eprintln!("warning: future stored but not indexed; run `datafutures reconcile --repair`");
            }
            println!("{}", record.id);
        }
        Command::Reveal {
            id,
            key,
            yes,
            trusted_signers,
        } => {
            let mut service = open_service(&config)?;
            if !trusted_signers.is_empty() {
                let keys = trusted_signers
                    .iter()
                    .map(|hex| datafutures_crypto::public_key_from_hex(hex))
                    .collect::<Result<Vec<_>, _>>()
                    .context("parsing --trusted-signer")?;
                service = service.with_verifier(ChallengeVerifier::pinned(keys));
            }
            let id = FutureId::parse(&id)?;
            let Some(record) = service.get(&id).await? else {
                bail!("no future with id {id}");
            };
            let signer = PromptSigner::new(load_signer(&key)?, yes);
            let value = service.reveal(&record, &signer).await?;
            println!("{value}");
        }
        Command::Reconcile { repair } => {
            let service = open_service(&config)?;
            let report = service.reconcile().await?;
            for id in &report.unindexed {
                println!("unindexed  {id}");
            }
            for id in &report.dangling {
                println!("dangling   {id}");
            }
            if report.is_consistent() {
                println!("index consistent");
            } else if repair {
                let added = service.repair().await?;
                println!("appended {added} record(s) to the index");
            }
        }
        Command::Stats => {
            let service = open_service(&config)?;
            let summary = service.summary().await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Keygen => {
            let keypair = datafutures_crypto::generate_keypair();
            println!("public key: {}", keypair.public);
            println!("seed:       {}", hex::encode(keypair.private.0));
        }
    }

    Ok(())
}
