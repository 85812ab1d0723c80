//! Record API URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use super::RecordId;
use crate::error::{Error, InvalidInputError};

/// A validated record API endpoint.
///
/// Network endpoints (HTTPS, or HTTP for localhost) talk to a remote record
/// API. `file://` endpoints point at a local record directory, which is
/// handy for development and tests.
///
/// # Example
///
/// ```
/// use marcfix_core::{ApiUrl, RecordId};
///
/// let api = ApiUrl::new("https://catalog.example.org/api/").unwrap();
/// let id = RecordId::new("9877349").unwrap();
/// assert_eq!(api.record_url(&id), "https://catalog.example.org/api/bib/009877349");
///
/// let local = ApiUrl::new("file:///tmp/records").unwrap();
/// assert!(local.is_local());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl {
    url: Url,
    root: Option<PathBuf>,
}

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

impl ApiUrl {
    /// Parse and check an endpoint.
    ///
    /// `file://` URLs need a non-root path. Anything else must be HTTPS
    /// with a host; plain HTTP is accepted for loopback hosts only.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let raw = s.as_ref();
        let reject = |reason: &str| -> Error {
            InvalidInputError::ApiUrl {
                value: raw.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let url = Url::parse(raw).map_err(|e| reject(&e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(reject("must be an absolute URL"));
        }

        match url.scheme() {
            "file" => {
                if matches!(url.path(), "" | "/") {
                    return Err(reject("file:// URL must have a path"));
                }
                let root = url
                    .to_file_path()
                    .map_err(|()| reject("file:// URL is not a local path"))?;
                Ok(Self {
                    url,
                    root: Some(root),
                })
            }
            scheme => {
                let host = url.host_str().ok_or_else(|| reject("must have a host"))?;
                let loopback = LOOPBACK_HOSTS.contains(&host);
                if scheme != "https" && !(scheme == "http" && loopback) {
                    return Err(reject("must use HTTPS (HTTP allowed only for localhost)"));
                }
                Ok(Self { url, root: None })
            }
        }
    }

    /// The endpoint for a single bibliographic record.
    pub fn record_url(&self, id: &RecordId) -> String {
        format!("{}/bib/{}", self.url.as_str().trim_end_matches('/'), id.padded())
    }

    /// The endpoint as a string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The host, for network endpoints.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Returns true for a local record directory (`file://`).
    pub fn is_local(&self) -> bool {
        self.root.is_some()
    }

    /// The local record directory, for `file://` endpoints.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        self.root.clone()
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
