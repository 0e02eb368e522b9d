//! Configuration module
//!
//! Settings for the policy engine: repository cache sizing, the optional
//! database connection and the rules applied to policies created without one.

use std::env;

use crate::constants::{
    DEFAULT_DIR_NAME_RULE, DEFAULT_FILE_NAME_RULE, DEFAULT_POLICY_CACHE_CAPACITY,
};
use crate::models::StoragePolicy;

/// Policy engine configuration
#[derive(Clone, Debug)]
pub struct PolicyEngineConfig {
    /// Maximum number of policies kept by the repository cache.
    pub policy_cache_capacity: usize,
    /// Postgres connection string; the in-memory repository is used when unset.
    pub database_url: Option<String>,
    pub default_dir_name_rule: String,
    pub default_file_name_rule: String,
}

impl Default for PolicyEngineConfig {
    fn default() -> Self {
        Self {
            policy_cache_capacity: DEFAULT_POLICY_CACHE_CAPACITY,
            database_url: None,
            default_dir_name_rule: DEFAULT_DIR_NAME_RULE.to_string(),
            default_file_name_rule: DEFAULT_FILE_NAME_RULE.to_string(),
        }
    }
}

impl PolicyEngineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let policy_cache_capacity = match env::var("POLICY_CACHE_CAPACITY") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
                anyhow::anyhow!("POLICY_CACHE_CAPACITY must be a positive integer")
            })?,
            Err(_) => DEFAULT_POLICY_CACHE_CAPACITY,
        };

        let config = PolicyEngineConfig {
            policy_cache_capacity,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            default_dir_name_rule: env::var("DEFAULT_DIR_NAME_RULE")
                .unwrap_or_else(|_| DEFAULT_DIR_NAME_RULE.to_string()),
            default_file_name_rule: env::var("DEFAULT_FILE_NAME_RULE")
                .unwrap_or_else(|_| DEFAULT_FILE_NAME_RULE.to_string()),
        };

        config.validate()?;
        tracing::debug!(
            cache_capacity = config.policy_cache_capacity,
            database = config.database_url.is_some(),
            "Loaded policy engine configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.policy_cache_capacity == 0 {
            return Err(anyhow::anyhow!(
                "POLICY_CACHE_CAPACITY must be greater than zero"
            ));
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.default_file_name_rule.trim().is_empty() {
            return Err(anyhow::anyhow!("DEFAULT_FILE_NAME_RULE must not be empty"));
        }

        Ok(())
    }

    /// Fill in empty naming rules of a policy from the configured defaults.
    pub fn apply_default_rules(&self, policy: &mut StoragePolicy) {
        if policy.dir_name_rule.is_empty() {
            policy.dir_name_rule = self.default_dir_name_rule.clone();
        }
        if policy.file_name_rule.is_empty() {
            policy.file_name_rule = self.default_file_name_rule.clone();
        }
    }
}
