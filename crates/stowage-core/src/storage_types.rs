use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Closed set of backends a storage policy can target. Tags that are not
/// recognized are kept verbatim in `Other` so a policy loaded from the
/// database never fails to parse; such policies get the generic behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageBackend {
    /// Local disk of the master node.
    #[default]
    Local,
    /// A remote slave node receiving uploads over HTTP.
    Remote,
    /// Qiniu Kodo.
    Qiniu,
    /// Aliyun OSS.
    Oss,
    /// UPYUN USS.
    Upyun,
    /// Tencent COS.
    Cos,
    /// Amazon S3 and compatible services.
    S3,
    /// Any tag not listed above.
    Other(String),
}

impl StorageBackend {
    /// Lowercase tag as stored in the `type` column.
    pub fn as_str(&self) -> &str {
        match self {
            StorageBackend::Local => "local",
            StorageBackend::Remote => "remote",
            StorageBackend::Qiniu => "qiniu",
            StorageBackend::Oss => "oss",
            StorageBackend::Upyun => "upyun",
            StorageBackend::Cos => "cos",
            StorageBackend::S3 => "s3",
            StorageBackend::Other(tag) => tag,
        }
    }

    /// Whether the tag was one of the recognized backends.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, StorageBackend::Other(_))
    }
}

impl FromStr for StorageBackend {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "local" => StorageBackend::Local,
            "remote" => StorageBackend::Remote,
            "qiniu" => StorageBackend::Qiniu,
            "oss" => StorageBackend::Oss,
            "upyun" => StorageBackend::Upyun,
            "cos" => StorageBackend::Cos,
            "s3" => StorageBackend::S3,
            _ => StorageBackend::Other(s.to_string()),
        })
    }
}

impl From<String> for StorageBackend {
    fn from(tag: String) -> Self {
        match tag.parse() {
            Ok(backend) => backend,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for StorageBackend {
    fn from(tag: &str) -> Self {
        StorageBackend::from(tag.to_string())
    }
}

impl From<StorageBackend> for String {
    fn from(backend: StorageBackend) -> Self {
        match backend {
            StorageBackend::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
