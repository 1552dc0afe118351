//! The HTTP Signatures signing string and `authorization` header

use crate::{
    capability::parse_params,
    error::Error,
    headers::{AUTHORIZATION, CAPABILITY_INVOCATION, CONTENT_TYPE, DIGEST, HOST},
};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
};
use url::{Position, Url};

pub const KEY_ID: &str = "(key-id)";
pub const CREATED: &str = "(created)";
pub const EXPIRES: &str = "(expires)";
pub const REQUEST_TARGET: &str = "(request-target)";

/// The algorithm name advertised in the `authorization` header; the actual
/// algorithm is implied by the key.
pub const SIGNATURE_ALGORITHM: &str = "hs2019";

/// Whether a value can sit inside a quoted header parameter and a single
/// line of the signing string
pub fn is_quotable(value: &str) -> bool {
    !value
        .chars()
        .any(|c| c == '"' || c == '\\' || c.is_control())
}

/// The ordered list of headers covered by an invocation signature. The body
/// headers are only covered when there is a JSON body.
pub fn included_headers(has_json: bool) -> Vec<String> {
    let mut headers = vec![KEY_ID, CREATED, EXPIRES, REQUEST_TARGET, HOST, CAPABILITY_INVOCATION];
    if has_json {
        headers.extend([CONTENT_TYPE, DIGEST]);
    }
    headers.into_iter().map(String::from).collect()
}

/// `<lower-case method> <path>[?<query>]`. A URL that cannot be parsed on
/// its own is accepted when it is already an absolute path.
pub fn request_target(method: &str, url: &str) -> Result<String, Error> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed[Position::BeforePath..Position::AfterQuery].to_string(),
        Err(_) if url.starts_with('/') => url.to_string(),
        Err(error) => {
            return Err(Error::InvalidUrl {
                url: url.into(),
                msg: error.to_string(),
            })
        }
    };

    Ok(format!("{} {path}", method.to_lowercase()))
}

/// Everything the signing string is resolved against
#[derive(Debug, Clone, Copy)]
pub struct SignatureRequest<'a> {
    pub url: &'a str,
    pub method: &'a str,
    pub headers: &'a BTreeMap<String, String>,
    pub created: u64,
    pub expires: u64,
    pub key_id: &'a str,
}

/// Build the newline separated `name: value` signing string. Pseudo-headers
/// resolve against the request; any other name must be present in the
/// header set.
pub fn signature_string(
    include_headers: &[String],
    request: &SignatureRequest<'_>,
) -> Result<String, Error> {
    let lines = include_headers
        .iter()
        .map(|name| {
            let value = match name.as_str() {
                KEY_ID => request.key_id.to_string(),
                CREATED => request.created.to_string(),
                EXPIRES => request.expires.to_string(),
                REQUEST_TARGET => request_target(request.method, request.url)?,
                other => request
                    .headers
                    .get(other)
                    .cloned()
                    .ok_or_else(|| Error::MissingHeader { name: other.into() })?,
            };
            Ok::<_, Error>(format!("{name}: {value}"))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(lines.join("\n"))
}

/// The value of an `authorization` header carrying an invocation signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub key_id: String,
    pub algorithm: String,
    pub created: u64,
    pub expires: u64,
    pub headers: Vec<String>,
    /// Standard base64 encoding of the signature bytes
    pub signature: String,
}

impl Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature keyId=\"{}\",algorithm=\"{}\",created={},expires={},headers=\"{}\",signature=\"{}\"",
            self.key_id,
            self.algorithm,
            self.created,
            self.expires,
            self.headers.join(" "),
            self.signature
        )
    }
}

impl FromStr for Authorization {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = |msg: String| Error::MalformedHeader {
            name: AUTHORIZATION.into(),
            msg,
        };

        let params = value
            .strip_prefix("Signature ")
            .ok_or_else(|| malformed("expected the \"Signature\" scheme".into()))?;
        let params: BTreeMap<String, String> =
            parse_params(params).map_err(malformed)?.into_iter().collect();

        let field = |key: &str| {
            params
                .get(key)
                .cloned()
                .ok_or_else(|| malformed(format!("missing \"{key}\"")))
        };
        let timestamp = |key: &str| -> Result<u64, Error> {
            field(key)?
                .parse::<u64>()
                .map_err(|error| malformed(format!("invalid \"{key}\": {error}")))
        };

        Ok(Authorization {
            key_id: field("keyId")?,
            algorithm: field("algorithm")?,
            created: timestamp("created")?,
            expires: timestamp("expires")?,
            headers: field("headers")?
                .split_whitespace()
                .map(String::from)
                .collect(),
            signature: field("signature")?,
        })
    }
}
