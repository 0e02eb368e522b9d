//! Options codec: canonical JSON encoding of [`PolicyOptions`].
//!
//! Call [`prepare_for_save`] immediately before a policy is written and
//! [`hydrate_after_load`] immediately after it is read.

use stowage_core::{AppError, PolicyOptions, StoragePolicy};

/// Encode an option bag. The output is stable for equal bags.
pub fn encode_options(options: &PolicyOptions) -> Result<String, AppError> {
    Ok(serde_json::to_string(options)?)
}

/// Decode a stored option string. An empty string is the default bag.
pub fn decode_options(encoded: &str) -> Result<PolicyOptions, AppError> {
    if encoded.trim().is_empty() {
        return Ok(PolicyOptions::default());
    }
    Ok(serde_json::from_str(encoded)?)
}

/// Refresh `policy.options` from `policy.options_serialized`.
pub fn prepare_for_save(policy: &mut StoragePolicy) -> Result<(), AppError> {
    policy.options = encode_options(&policy.options_serialized)?;
    Ok(())
}

/// Refresh `policy.options_serialized` from `policy.options`.
///
/// Policies with an unrecognized backend tag still load; they get the generic
/// backend behavior, which is logged here once per load.
pub fn hydrate_after_load(policy: &mut StoragePolicy) -> Result<(), AppError> {
    if !policy.backend.is_recognized() {
        tracing::warn!(
            policy_id = policy.id,
            backend = %policy.backend,
            "Unknown storage backend, falling back to generic behavior"
        );
    }

    policy.options_serialized = decode_options(&policy.options).map_err(|e| {
        tracing::warn!(policy_id = policy.id, error = %e, "Stored policy options are malformed");
        e
    })?;
    Ok(())
}
