//! Header normalization and the signed header set

use crate::error::Error;
use std::collections::{btree_map, BTreeMap};
use url::Url;

pub const HOST: &str = "host";
pub const DIGEST: &str = "digest";
pub const CONTENT_TYPE: &str = "content-type";
pub const CAPABILITY_INVOCATION: &str = "capability-invocation";
pub const AUTHORIZATION: &str = "authorization";

/// Whether the `host` header is left in the signed result. It is always
/// signed; some HTTP clients insist on setting it themselves, in which case
/// it should be omitted from the headers handed back to them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HostHeader {
    #[default]
    Emit,
    Omit,
}

/// Lower-case every header name. Names that collide once lower-cased are
/// rejected rather than silently overwriting each other.
pub fn normalize_headers<I, K, V>(headers: I) -> Result<BTreeMap<String, String>, Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut normalized = BTreeMap::new();

    for (name, value) in headers {
        let name = name.as_ref().trim().to_lowercase();

        if name.is_empty() {
            return Err(Error::InvalidHeaders {
                msg: "Header names must not be empty".into(),
            });
        }

        match normalized.entry(name) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value.into());
            }
            btree_map::Entry::Occupied(entry) => {
                return Err(Error::InvalidHeaders {
                    msg: format!("Header \"{}\" was given more than once", entry.key()),
                })
            }
        }
    }

    Ok(normalized)
}

/// The authority of a URL as it would appear in a `host` header: the host
/// and, when it isn't the scheme's default, the port.
pub fn host_from_url(url: &str) -> Result<String, Error> {
    let parsed = Url::parse(url).map_err(|error| Error::InvalidUrl {
        url: url.into(),
        msg: error.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| Error::InvalidUrl {
        url: url.into(),
        msg: "URL has no host".into(),
    })?;

    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Ensure the header set names a host, deriving it from the URL when the
/// caller did not supply one.
pub fn ensure_host(headers: &mut BTreeMap<String, String>, url: &str) -> Result<(), Error> {
    if !headers.contains_key(HOST) {
        headers.insert(HOST.into(), host_from_url(url)?);
    }
    Ok(())
}

/// The complete header set of a signed capability invocation, keyed by
/// lower-case header name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedHeaders(BTreeMap<String, String>);

impl SignedHeaders {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for SignedHeaders {
    fn from(headers: BTreeMap<String, String>) -> Self {
        SignedHeaders(headers)
    }
}

impl IntoIterator for SignedHeaders {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
