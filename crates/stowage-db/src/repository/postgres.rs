//! Postgres-backed policy repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use stowage_core::{AppError, PolicyOptions, StorageBackend, StoragePolicy};

use super::PolicyRepository;
use crate::codec::{hydrate_after_load, prepare_for_save};

const POLICY_COLUMNS: &str = "id, name, type, server, bucket_name, is_private, base_url, \
     access_key, secret_key, max_size, auto_rename, dir_name_rule, file_name_rule, \
     is_origin_link_enable, options";

/// Row type for the policies table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct PolicyRow {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub backend: String,
    pub server: String,
    pub bucket_name: String,
    pub is_private: bool,
    pub base_url: String,
    pub access_key: String,
    pub secret_key: String,
    pub max_size: i64,
    pub auto_rename: bool,
    pub dir_name_rule: String,
    pub file_name_rule: String,
    pub is_origin_link_enable: bool,
    pub options: String,
}

impl PolicyRow {
    pub fn to_storage_policy(self) -> StoragePolicy {
        StoragePolicy {
            id: self.id,
            name: self.name,
            backend: StorageBackend::from(self.backend),
            server: self.server,
            bucket_name: self.bucket_name,
            is_private: self.is_private,
            base_url: self.base_url,
            access_key: self.access_key,
            secret_key: self.secret_key,
            max_size: u64::try_from(self.max_size).unwrap_or(0),
            auto_rename: self.auto_rename,
            dir_name_rule: self.dir_name_rule,
            file_name_rule: self.file_name_rule,
            is_origin_link_enable: self.is_origin_link_enable,
            options: self.options,
            options_serialized: PolicyOptions::default(),
        }
    }
}

/// Repository for the policies table.
#[derive(Clone)]
pub struct PgPolicyRepository {
    pool: PgPool,
}

impl PgPolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url` and wrap it.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Insert or update a policy. Runs the options encoder first, so the
    /// stored `options` column always matches `options_serialized`.
    #[tracing::instrument(skip(self, policy), fields(db.table = "policies", db.record_id = policy.id))]
    pub async fn save(&self, policy: &mut StoragePolicy) -> Result<(), AppError> {
        prepare_for_save(policy)?;
        let max_size = i64::try_from(policy.max_size)
            .map_err(|_| AppError::InvalidInput("max_size is out of range".to_string()))?;

        sqlx::query::<Postgres>(
            r#"
            INSERT INTO policies (id, name, type, server, bucket_name, is_private, base_url,
                access_key, secret_key, max_size, auto_rename, dir_name_rule, file_name_rule,
                is_origin_link_enable, options)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name, type = EXCLUDED.type, server = EXCLUDED.server,
                bucket_name = EXCLUDED.bucket_name, is_private = EXCLUDED.is_private,
                base_url = EXCLUDED.base_url, access_key = EXCLUDED.access_key,
                secret_key = EXCLUDED.secret_key, max_size = EXCLUDED.max_size,
                auto_rename = EXCLUDED.auto_rename, dir_name_rule = EXCLUDED.dir_name_rule,
                file_name_rule = EXCLUDED.file_name_rule,
                is_origin_link_enable = EXCLUDED.is_origin_link_enable,
                options = EXCLUDED.options
            "#,
        )
        .bind(policy.id)
        .bind(&policy.name)
        .bind(policy.backend.as_str())
        .bind(&policy.server)
        .bind(&policy.bucket_name)
        .bind(policy.is_private)
        .bind(&policy.base_url)
        .bind(&policy.access_key)
        .bind(&policy.secret_key)
        .bind(max_size)
        .bind(policy.auto_rename)
        .bind(&policy.dir_name_rule)
        .bind(&policy.file_name_rule)
        .bind(policy.is_origin_link_enable)
        .bind(&policy.options)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PolicyRepository for PgPolicyRepository {
    #[tracing::instrument(skip(self), fields(db.table = "policies", db.record_id = id))]
    async fn get_by_id(&self, id: i64) -> Result<StoragePolicy, AppError> {
        let query = format!("SELECT {} FROM policies WHERE id = $1", POLICY_COLUMNS);
        let row: Option<PolicyRow> = sqlx::query_as::<Postgres, PolicyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let mut policy = row.ok_or(AppError::NotFound(id))?.to_storage_policy();
        hydrate_after_load(&mut policy)?;
        Ok(policy)
    }
}
