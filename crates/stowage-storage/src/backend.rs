//! Backend trait table
//!
//! Behavioral facts of each backend type, stored as rows keyed by the
//! backend tag. Supporting a new provider means adding a row here.

use serde::Serialize;
use stowage_core::constants::{
    LOCAL_UPLOAD_SUFFIX, OSS_FILENAME_CALLBACK, REMOTE_UPLOAD_SUFFIX, UPYUN_FILENAME_CALLBACK,
};
use stowage_core::StorageBackend;

/// What `{originname}` turns into for a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "template", rename_all = "snake_case")]
pub enum OriginName {
    /// The original file name supplied by the uploader.
    Literal,
    /// A provider-side variable that the provider fills in after the upload.
    Callback(&'static str),
}

/// Behavioral facts of one backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackendTraits {
    /// Appended to the policy server URL to build the upload endpoint.
    pub upload_suffix: Option<&'static str>,
    /// Files can be served without proxying or signing.
    pub direct_preview: bool,
    /// The storage path must be generated before the upload starts.
    pub path_pre_generation: bool,
    pub origin_name: OriginName,
}

/// Traits used for unrecognized backend tags.
pub const GENERIC_TRAITS: BackendTraits = BackendTraits {
    upload_suffix: None,
    direct_preview: false,
    path_pre_generation: false,
    origin_name: OriginName::Literal,
};

// Client-chosen deterministic keys.
const DETERMINISTIC_KEY_TRAITS: BackendTraits = BackendTraits {
    upload_suffix: None,
    direct_preview: false,
    path_pre_generation: true,
    origin_name: OriginName::Literal,
};

static BACKEND_TRAITS: &[(&str, BackendTraits)] = &[
    (
        "local",
        BackendTraits {
            upload_suffix: Some(LOCAL_UPLOAD_SUFFIX),
            direct_preview: true,
            path_pre_generation: false,
            origin_name: OriginName::Literal,
        },
    ),
    (
        "remote",
        BackendTraits {
            upload_suffix: Some(REMOTE_UPLOAD_SUFFIX),
            direct_preview: false,
            path_pre_generation: false,
            origin_name: OriginName::Literal,
        },
    ),
    ("qiniu", DETERMINISTIC_KEY_TRAITS),
    ("cos", DETERMINISTIC_KEY_TRAITS),
    ("s3", DETERMINISTIC_KEY_TRAITS),
    (
        "oss",
        BackendTraits {
            upload_suffix: None,
            direct_preview: false,
            path_pre_generation: true,
            origin_name: OriginName::Callback(OSS_FILENAME_CALLBACK),
        },
    ),
    (
        "upyun",
        BackendTraits {
            upload_suffix: None,
            direct_preview: false,
            path_pre_generation: true,
            origin_name: OriginName::Callback(UPYUN_FILENAME_CALLBACK),
        },
    ),
];

/// Look up the traits of a backend. Unrecognized tags get [`GENERIC_TRAITS`].
pub fn traits_for(backend: &StorageBackend) -> &'static BackendTraits {
    let tag = backend.as_str();
    let row = BACKEND_TRAITS.iter().find(|(name, _)| *name == tag);
    match row {
        Some((_, traits)) => traits,
        None if backend.is_recognized() => {
            tracing::warn!(backend = %tag, "Recognized backend has no traits row, using generic behavior");
            &GENERIC_TRAITS
        }
        None => {
            tracing::debug!(backend = %tag, "No traits registered for backend, using generic behavior");
            &GENERIC_TRAITS
        }
    }
}

/// Build the upload endpoint from a server URL.
pub fn upload_url(server: &str, traits: &BackendTraits) -> String {
    match traits.upload_suffix {
        Some(suffix) => format!("{}{}", server, suffix),
        None => server.to_string(),
    }
}
