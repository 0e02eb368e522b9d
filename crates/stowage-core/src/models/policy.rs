//! Storage policy model: one storage backend plus the rules used to name
//! the files uploaded to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage_types::StorageBackend;

/// Policy-specific settings persisted as a JSON document in the `options` column.
///
/// Known settings are typed fields; anything else is kept in `extra` so
/// settings written by newer versions survive a load/save cycle. Field order
/// and the sorted `extra` map make the encoding deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyOptions {
    /// Operator name (UPYUN) or provider-side object name prefix.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub op_name: String,
    /// Operator password (UPYUN).
    #[serde(rename = "op_pwd", default, skip_serializing_if = "String::is_empty")]
    pub op_password: String,
    /// Allowed file extensions, without the leading dot. Empty allows all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_type: Vec<String>,
    /// MIME type restriction forwarded to providers that support one.
    #[serde(rename = "mimetype", default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A storage policy as loaded from the policy repository.
///
/// `options` is the persisted encoding of `options_serialized`. The two are
/// kept in sync by the codec in `stowage-db`, which encodes right before a
/// save and decodes right after a load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoragePolicy {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub backend: StorageBackend,
    pub server: String,
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    /// Maximum upload size in bytes, 0 means unlimited.
    #[serde(default)]
    pub max_size: u64,
    #[serde(default)]
    pub auto_rename: bool,
    #[serde(default)]
    pub dir_name_rule: String,
    #[serde(default)]
    pub file_name_rule: String,
    #[serde(default)]
    pub is_origin_link_enable: bool,
    /// Encoded form of `options_serialized`.
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub options_serialized: PolicyOptions,
}

impl StoragePolicy {
    /// Check a file name against the `file_type` allow-list.
    ///
    /// The comparison is case-insensitive. A file without an extension is only
    /// accepted when the list is empty.
    pub fn allows_extension(&self, file_name: &str) -> bool {
        let allowed = &self.options_serialized.file_type;
        if allowed.is_empty() {
            return true;
        }

        let extension = match file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
            _ => return false,
        };

        allowed
            .iter()
            .any(|candidate| candidate.trim_start_matches('.').to_lowercase() == extension)
    }

    /// Check an upload size against `max_size`.
    pub fn allows_size(&self, size: u64) -> bool {
        self.max_size == 0 || size <= self.max_size
    }

    /// Copy of the policy safe to print: credentials are masked in the typed
    /// fields, in the option bag and in the encoded `options` string.
    pub fn redacted(&self) -> StoragePolicy {
        let mut policy = self.clone();
        policy.access_key = mask_secret(&policy.access_key);
        policy.secret_key = mask_secret(&policy.secret_key);
        policy.options_serialized = self.options_serialized.redacted();
        policy.options = redact_encoded_options(&self.options);
        policy
    }
}

impl PolicyOptions {
    /// Copy of the bag with `op_pwd` and sensitive `extra` keys masked.
    pub fn redacted(&self) -> PolicyOptions {
        let mut options = self.clone();
        options.op_password = mask_secret(&options.op_password);
        for (key, value) in options.extra.iter_mut() {
            if is_sensitive_key(key) {
                if let Some(s) = value.as_str() {
                    *value = serde_json::Value::String(mask_secret(s));
                }
            }
        }
        options
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    key_lower.contains("pwd")
        || key_lower.contains("password")
        || key_lower.contains("secret")
        || key_lower.contains("token")
        || key_lower.contains("access_key")
        || key_lower.contains("private_key")
        || key_lower.contains("credential")
}

/// Keep a short prefix of long values and mask the rest. Empty stays empty.
fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    let keep = if len > 10 {
        7
    } else if len > 4 {
        3
    } else {
        0
    };
    if len == 0 {
        return String::new();
    }
    let prefix: String = value.chars().take(keep).collect();
    format!("{}***", prefix)
}

// Works on the raw string so a stored value that does not decode is never printed as-is.
fn redact_encoded_options(encoded: &str) -> String {
    if encoded.trim().is_empty() {
        return encoded.to_string();
    }
    match serde_json::from_str::<serde_json::Value>(encoded) {
        Ok(serde_json::Value::Object(map)) => {
            let redacted: serde_json::Map<String, serde_json::Value> = map
                .into_iter()
                .map(|(key, value)| match value.as_str() {
                    Some(s) if is_sensitive_key(&key) => {
                        let masked = serde_json::Value::String(mask_secret(s));
                        (key, masked)
                    }
                    _ => (key, value),
                })
                .collect();
            serde_json::Value::Object(redacted).to_string()
        }
        _ => "***".to_string(),
    }
}
