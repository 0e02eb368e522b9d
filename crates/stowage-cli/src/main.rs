//! Stowage CLI: inspect how storage policies name and route uploads.
//!
//! Policies come from Postgres when DATABASE_URL is set, otherwise from the
//! JSON file given with --policies.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use stowage_cli::{check_upload, init_tracing, read_policies, render_policy};
use stowage_core::{PolicyEngineConfig, PolicyOptions};
use stowage_db::{
    encode_options, CachedPolicyRepository, InMemoryPolicyRepository, PgPolicyRepository,
    PolicyRepository,
};
use stowage_storage::PolicyExt;

#[derive(Parser)]
#[command(name = "stowage", about = "Storage policy naming and dispatch")]
struct Cli {
    /// JSON file with an array of policies (ignored when DATABASE_URL is set)
    #[arg(long, global = true)]
    policies: Option<PathBuf>,
    /// Policy ID
    #[arg(long, global = true)]
    policy: Option<i64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an options JSON file into its stored form
    EncodeOptions {
        /// Options JSON file
        file: PathBuf,
    },
    #[command(flatten)]
    Policy(PolicyCommands),
}

/// Commands that operate on the policy selected with --policy.
#[derive(Subcommand)]
enum PolicyCommands {
    /// Print a policy with its decoded options (credentials masked)
    Show,
    /// Expand the directory rule
    Path {
        /// User ID
        #[arg(long, default_value = "1")]
        uid: u64,
        /// Base path substituted for {path}
        #[arg(long, default_value = "/")]
        base: String,
    },
    /// Expand the file name rule
    Filename {
        /// User ID
        #[arg(long, default_value = "1")]
        uid: u64,
        /// Original file name substituted for {originname}
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Print the upload endpoint
    UploadUrl,
    /// Print the backend traits of a policy
    Traits,
    /// Check a file against the policy's allowed types and size limit
    Check {
        /// File name to check
        #[arg(long)]
        name: String,
        /// File size in bytes
        #[arg(long, default_value = "0")]
        size: u64,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn open_repository(
    cli: &Cli,
    config: &PolicyEngineConfig,
) -> anyhow::Result<Arc<dyn PolicyRepository>> {
    if let Some(url) = &config.database_url {
        let repo = PgPolicyRepository::connect(url)
            .await
            .context("Failed to connect to DATABASE_URL")?;
        return Ok(Arc::new(repo));
    }

    let path = cli
        .policies
        .as_ref()
        .context("Set DATABASE_URL or pass --policies <file>")?;
    let repo = InMemoryPolicyRepository::new();
    for policy in read_policies(path, config)? {
        repo.insert(policy)?;
    }
    tracing::debug!(count = repo.len(), "Loaded policies from file");
    Ok(Arc::new(repo))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let command = match &cli.command {
        Commands::EncodeOptions { file } => {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let options: PolicyOptions =
                serde_json::from_str(&raw).context("Options file must be a JSON object")?;
            println!("{}", encode_options(&options)?);
            return Ok(());
        }
        Commands::Policy(command) => command,
    };

    let config = PolicyEngineConfig::from_env()?;
    let capacity = NonZeroUsize::new(config.policy_cache_capacity)
        .context("POLICY_CACHE_CAPACITY must be greater than zero")?;
    let repo = CachedPolicyRepository::new(open_repository(&cli, &config).await?, capacity);

    let id = cli.policy.context("Pass --policy <id>")?;
    let policy = repo.get_by_id(id).await?;

    match command {
        PolicyCommands::Show => println!("{}", render_policy(&policy)?),
        PolicyCommands::Path { uid, base } => {
            print_json(&serde_json::json!({ "path": policy.generate_path(*uid, base) }))?;
        }
        PolicyCommands::Filename { uid, name } => {
            print_json(&serde_json::json!({
                "file_name": policy.generate_file_name(*uid, name)
            }))?;
        }
        PolicyCommands::UploadUrl => {
            print_json(&serde_json::json!({ "upload_url": policy.upload_url() }))?;
        }
        PolicyCommands::Traits => print_json(policy.traits())?,
        PolicyCommands::Check { name, size } => {
            print_json(&check_upload(&policy, name, *size))?;
        }
    }

    Ok(())
}
