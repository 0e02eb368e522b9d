use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use stowage_core::{PolicyEngineConfig, StoragePolicy};

/// Result of checking an upload against a policy's restrictions.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UploadCheck {
    pub file_name: String,
    pub size: u64,
    pub extension_allowed: bool,
    pub size_allowed: bool,
    pub allowed: bool,
}

/// Check a file name and size against the policy's allow-list and size limit.
pub fn check_upload(policy: &StoragePolicy, file_name: &str, size: u64) -> UploadCheck {
    let extension_allowed = policy.allows_extension(file_name);
    let size_allowed = policy.allows_size(size);
    UploadCheck {
        file_name: file_name.to_string(),
        size,
        extension_allowed,
        size_allowed,
        allowed: extension_allowed && size_allowed,
    }
}

/// Pretty JSON of a policy with its credentials masked.
pub fn render_policy(policy: &StoragePolicy) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&policy.redacted()).context("Serialize policy")
}

/// Read a JSON array of policies and fill in empty rules from `config`.
pub fn read_policies(path: &Path, config: &PolicyEngineConfig) -> anyhow::Result<Vec<StoragePolicy>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policies from {}", path.display()))?;
    parse_policies(&raw, config)
}

/// Parse a JSON array of policies and fill in empty rules from `config`.
pub fn parse_policies(raw: &str, config: &PolicyEngineConfig) -> anyhow::Result<Vec<StoragePolicy>> {
    let mut policies: Vec<StoragePolicy> =
        serde_json::from_str(raw).context("Policies file must be a JSON array of policies")?;
    for policy in &mut policies {
        config.apply_default_rules(policy);
    }
    Ok(policies)
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
