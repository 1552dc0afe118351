//! Content digests for JSON bodies, formatted as multibase-encoded
//! multihashes (`mh=u<base64url multihash>`)

use crate::{
    error::Error,
    headers::{CONTENT_TYPE, DIGEST},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256, Sha512};
use std::collections::BTreeMap;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Multibase prefix for unpadded base64url
const MULTIBASE_BASE64URL: char = 'u';

/// Hash algorithms a body digest can be computed with
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// The multicodec code identifying this hash in a multihash
    pub fn multihash_code(&self) -> u64 {
        match self {
            DigestAlgorithm::Sha256 => 0x12,
            DigestAlgorithm::Sha512 => 0x13,
        }
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// `<code varint><length varint><digest>`
    pub fn multihash(&self, data: &[u8]) -> Vec<u8> {
        let digest = self.digest(data);

        let mut code_buffer = unsigned_varint::encode::u64_buffer();
        let mut length_buffer = unsigned_varint::encode::u64_buffer();

        [
            unsigned_varint::encode::u64(self.multihash_code(), &mut code_buffer),
            unsigned_varint::encode::u64(digest.len() as u64, &mut length_buffer),
            digest.as_slice(),
        ]
        .concat()
    }
}

/// The `digest` header value for a JSON body
pub fn create_digest_header_value<T: Serialize + ?Sized>(
    json: &T,
    algorithm: DigestAlgorithm,
) -> Result<String, Error> {
    let data = serde_json::to_vec(json)?;
    let multihash = algorithm.multihash(&data);

    Ok(format!(
        "mh={MULTIBASE_BASE64URL}{}",
        URL_SAFE_NO_PAD.encode(multihash)
    ))
}

/// Set `digest` and `content-type` for a JSON body. A digest the caller
/// already supplied is never replaced; `content-type` is only filled in when
/// absent.
pub fn attach_digest(
    headers: &mut BTreeMap<String, String>,
    json: &Value,
    algorithm: DigestAlgorithm,
) -> Result<(), Error> {
    if headers.contains_key(DIGEST) {
        warn!("Keeping caller supplied digest header; it is not checked against the body");
    } else {
        headers.insert(DIGEST.into(), create_digest_header_value(json, algorithm)?);
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE.into(), JSON_CONTENT_TYPE.into());
    }

    Ok(())
}
