//! Capability references and the `capability-invocation` header

use crate::{error::Error, signature::is_quotable};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fmt::{self, Display},
    io::{Read, Write},
    str::FromStr,
};

pub const ZCAP_ROOT_PREFIX: &str = "urn:zcap:root:";

/// Everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the set left alone by
/// JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A capability document as it is embedded in an invocation. Only `id` and
/// `parentCapability` are interpreted; every other field is carried through
/// untouched so the embedded copy is faithful to the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDocument {
    pub id: String,

    #[serde(
        rename = "parentCapability",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_capability: Option<Value>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CapabilityDocument {
    /// A document is delegated when it names a parent capability. Empty or
    /// falsy parents (`null`, `false`, `0`, `""`) name nothing.
    pub fn is_delegated(&self) -> bool {
        match &self.parent_capability {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(parent)) => !parent.is_empty(),
            Some(Value::Number(parent)) => parent.as_f64() != Some(0.0),
            Some(_) => true,
        }
    }
}

/// The capability a caller asks to invoke: either a bare identifier or a
/// full document
#[derive(Debug, Clone, PartialEq)]
pub enum Capability {
    Id(String),
    Document(CapabilityDocument),
}

impl Capability {
    /// The root capability implied by an invocation target,
    /// `urn:zcap:root:<percent-encoded url>`
    pub fn root_for(url: &str) -> Self {
        Capability::Id(format!(
            "{ZCAP_ROOT_PREFIX}{}",
            utf8_percent_encode(url, URI_COMPONENT)
        ))
    }

    /// Decide how this capability is referenced. A document without a parent
    /// is a root capability and collapses to its identifier.
    pub fn classify(self) -> Result<ResolvedCapability, Error> {
        let resolved = match self {
            Capability::Id(id) => ResolvedCapability::RootById(id),
            Capability::Document(document) if document.is_delegated() => {
                ResolvedCapability::Delegated(document)
            }
            Capability::Document(document) => ResolvedCapability::RootById(document.id),
        };

        if resolved.id().is_empty() {
            return Err(Error::InvalidCapability {
                msg: "capability id must not be empty".into(),
            });
        }

        if !is_quotable(resolved.id()) {
            return Err(Error::InvalidCapability {
                msg: "capability id must not contain quotes or control characters".into(),
            });
        }

        Ok(resolved)
    }
}

impl From<&str> for Capability {
    fn from(id: &str) -> Self {
        Capability::Id(id.into())
    }
}

impl From<String> for Capability {
    fn from(id: String) -> Self {
        Capability::Id(id)
    }
}

impl From<CapabilityDocument> for Capability {
    fn from(document: CapabilityDocument) -> Self {
        Capability::Document(document)
    }
}

impl TryFrom<Value> for Capability {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(id) => Ok(Capability::Id(id)),
            Value::Object(_) => serde_json::from_value(value)
                .map(Capability::Document)
                .map_err(|error| Error::InvalidCapability {
                    msg: error.to_string(),
                }),
            other => Err(Error::InvalidCapability {
                msg: format!("expected a string or an object, found {other}"),
            }),
        }
    }
}

/// A capability after classification
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCapability {
    RootById(String),
    Delegated(CapabilityDocument),
}

impl ResolvedCapability {
    pub fn id(&self) -> &str {
        match self {
            ResolvedCapability::RootById(id) => id,
            ResolvedCapability::Delegated(document) => &document.id,
        }
    }
}

/// Serialize a capability document to JSON, gzip it and encode the result as
/// unpadded base64url so it can travel in a header value.
pub fn encode_capability(document: &CapabilityDocument) -> Result<String, Error> {
    let json = serde_json::to_vec(document)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// The inverse of [`encode_capability`]
pub fn decode_capability(encoded: &str) -> Result<CapabilityDocument, Error> {
    let compressed = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|error| Error::EncodingError {
            msg: format!("Could not decode capability base64: {error}"),
        })?;

    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;

    Ok(serde_json::from_slice(&json)?)
}

/// How the invoked capability is referenced in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityReference {
    /// `id="..."`, for root capabilities
    Id(String),
    /// `capability="..."`, an embedded delegated capability
    Embedded(String),
}

/// The value of a `capability-invocation` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityInvocation {
    pub capability: CapabilityReference,
    pub action: Option<String>,
}

impl CapabilityInvocation {
    pub fn new(capability: &ResolvedCapability, action: &str) -> Result<Self, Error> {
        let capability = match capability {
            ResolvedCapability::RootById(id) => CapabilityReference::Id(id.clone()),
            ResolvedCapability::Delegated(document) => {
                CapabilityReference::Embedded(encode_capability(document)?)
            }
        };

        Ok(CapabilityInvocation {
            capability,
            action: Some(action.to_string()),
        })
    }

    /// Recover the embedded capability document, if there is one
    pub fn capability_document(&self) -> Result<Option<CapabilityDocument>, Error> {
        match &self.capability {
            CapabilityReference::Id(_) => Ok(None),
            CapabilityReference::Embedded(encoded) => decode_capability(encoded).map(Some),
        }
    }
}

impl Display for CapabilityInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.capability {
            CapabilityReference::Id(id) => write!(f, "zcap id=\"{id}\"")?,
            CapabilityReference::Embedded(encoded) => write!(f, "zcap capability=\"{encoded}\"")?,
        }

        if let Some(action) = &self.action {
            write!(f, ",action=\"{action}\"")?;
        }

        Ok(())
    }
}

impl FromStr for CapabilityInvocation {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = |msg: &str| Error::MalformedHeader {
            name: crate::headers::CAPABILITY_INVOCATION.into(),
            msg: msg.into(),
        };

        let params = value
            .strip_prefix("zcap ")
            .ok_or_else(|| malformed("expected the \"zcap\" scheme"))?;

        let mut capability = None;
        let mut action = None;

        for (key, value) in parse_params(params).map_err(|msg| malformed(&msg))? {
            match key.as_str() {
                "id" => capability = Some(CapabilityReference::Id(value)),
                "capability" => capability = Some(CapabilityReference::Embedded(value)),
                "action" => action = Some(value),
                _ => (),
            }
        }

        Ok(CapabilityInvocation {
            capability: capability.ok_or_else(|| malformed("missing \"id\" or \"capability\""))?,
            action,
        })
    }
}

/// Split `key="value",key=value` parameter lists as used by the
/// `capability-invocation` and `authorization` headers
pub(crate) fn parse_params(params: &str) -> Result<Vec<(String, String)>, String> {
    let mut parsed = Vec::new();
    let mut rest = params.trim();

    while !rest.is_empty() {
        let (key, after_key) = rest
            .split_once('=')
            .ok_or_else(|| format!("expected key=value in \"{rest}\""))?;

        let (value, after_value) = match after_key.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted
                    .find('"')
                    .ok_or_else(|| format!("unterminated value for \"{key}\""))?;
                (&quoted[..end], &quoted[end + 1..])
            }
            None => match after_key.find(',') {
                Some(end) => (&after_key[..end], &after_key[end..]),
                None => (after_key, ""),
            },
        };

        parsed.push((key.trim().to_string(), value.to_string()));

        rest = after_value.trim_start();
        rest = match rest.strip_prefix(',') {
            Some(next) => next.trim_start(),
            None if rest.is_empty() => rest,
            None => return Err(format!("expected ',' before \"{rest}\"")),
        };
    }

    Ok(parsed)
}
