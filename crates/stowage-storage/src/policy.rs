//! Path, file name and upload endpoint resolution for a storage policy.

use stowage_core::StoragePolicy;

use crate::backend::{self, traits_for, BackendTraits};
use crate::naming::{clean_path, expand, ResolutionContext, RuleKind};

/// Read-only operations the transfer layer needs from a [`StoragePolicy`].
pub trait PolicyExt {
    /// Behavioral facts of the policy's backend.
    fn traits(&self) -> &'static BackendTraits;

    /// Expand the directory rule for an upload by `uid` under `base_path`.
    fn generate_path(&self, uid: u64, base_path: &str) -> String {
        self.generate_path_with(&ResolutionContext::new(uid).with_base_path(base_path))
    }

    /// Expand the file name rule for an upload of `origin_name` by `uid`.
    fn generate_file_name(&self, uid: u64, origin_name: &str) -> String {
        self.generate_file_name_with(&ResolutionContext::new(uid).with_origin_name(origin_name))
    }

    fn generate_path_with(&self, ctx: &ResolutionContext<'_>) -> String;

    fn generate_file_name_with(&self, ctx: &ResolutionContext<'_>) -> String;

    /// Endpoint uploads for this policy are sent to.
    fn upload_url(&self) -> String;

    /// Whether files can be served without going through a proxy or signer.
    fn is_directly_preview(&self) -> bool {
        self.traits().direct_preview
    }

    /// Whether the storage path must be known before the upload starts.
    fn is_path_generate_needed(&self) -> bool {
        self.traits().path_pre_generation
    }
}

impl PolicyExt for StoragePolicy {
    fn traits(&self) -> &'static BackendTraits {
        traits_for(&self.backend)
    }

    fn generate_path_with(&self, ctx: &ResolutionContext<'_>) -> String {
        let expanded = expand(&self.dir_name_rule, ctx, RuleKind::Directory, self.traits());
        let path = clean_path(&expanded);
        tracing::debug!(
            policy_id = self.id,
            backend = %self.backend,
            uid = ctx.uid,
            path = %path,
            "Generated storage path"
        );
        path
    }

    fn generate_file_name_with(&self, ctx: &ResolutionContext<'_>) -> String {
        if !self.auto_rename {
            return ctx.origin_name.to_string();
        }

        let name = expand(&self.file_name_rule, ctx, RuleKind::FileName, self.traits());
        tracing::debug!(
            policy_id = self.id,
            backend = %self.backend,
            uid = ctx.uid,
            file_name = %name,
            "Generated file name"
        );
        name
    }

    fn upload_url(&self) -> String {
        backend::upload_url(&self.server, self.traits())
    }
}
