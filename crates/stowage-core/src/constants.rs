//! Shared constants for storage policies.

/// Upload endpoint appended to the server URL of a `local` policy.
pub const LOCAL_UPLOAD_SUFFIX: &str = "/api/v3/file/upload";

/// Upload endpoint appended to the server URL of a `remote` (slave node) policy.
pub const REMOTE_UPLOAD_SUFFIX: &str = "/api/v3/slave/upload";

/// Callback variable OSS substitutes with the uploaded file name.
pub const OSS_FILENAME_CALLBACK: &str = "${filename}";

/// Callback variables UPYUN substitutes with the base name and the extension.
pub const UPYUN_FILENAME_CALLBACK: &str = "{filename}{.suffix}";

/// Default capacity of the policy cache.
pub const DEFAULT_POLICY_CACHE_CAPACITY: usize = 128;

/// Default directory naming rule for policies created without one.
pub const DEFAULT_DIR_NAME_RULE: &str = "uploads/{uid}/{path}";

/// Default file naming rule for policies created without one.
pub const DEFAULT_FILE_NAME_RULE: &str = "{randomkey8}_{originname}";
