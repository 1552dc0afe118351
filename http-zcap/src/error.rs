//! Error types for capability invocation signing

use thiserror::Error;

/// Error types for capability invocation signing
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP method was missing or empty
    #[error("\"method\" must be a string.")]
    InvalidMethod,

    /// The capability action was missing or empty
    #[error("\"capabilityAction\" must be a string.")]
    InvalidCapabilityAction,

    /// The invocation signer was missing or could not name its key
    #[error("Invalid invocation signer: {msg}")]
    InvalidInvocationSigner {
        /// Error message
        msg: String,
    },

    /// The capability was neither a usable identifier nor a document with an id
    #[error(
        "\"capability\" must be a string to invoke a root capability or an object to invoke a delegated capability: {msg}"
    )]
    InvalidCapability {
        /// Error message
        msg: String,
    },

    /// The target URL could not be parsed
    #[error("Invalid URL \"{url}\": {msg}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Error message
        msg: String,
    },

    /// The header set was missing or malformed
    #[error("Invalid headers: {msg}")]
    InvalidHeaders {
        /// Error message
        msg: String,
    },

    /// A header named in the signed header list has no value
    #[error("Missing header \"{name}\" required by the signature")]
    MissingHeader {
        /// Header name
        name: String,
    },

    /// A header value could not be parsed
    #[error("Malformed \"{name}\" header: {msg}")]
    MalformedHeader {
        /// Header name
        name: String,
        /// Error message
        msg: String,
    },

    /// Serializing, compressing or decoding a payload failed
    #[error("Encoding error: {msg}")]
    EncodingError {
        /// Error message
        msg: String,
    },

    /// The invocation signer failed to produce a signature
    #[error("Error signing capability invocation.\nmethod: \"{method}\",\nurl: \"{url}\",\naction: \"{action}\"")]
    SigningFailure {
        /// HTTP method of the request being signed
        method: String,
        /// Target URL of the request being signed
        url: String,
        /// Capability action being invoked
        action: String,
        /// The signer's own error
        #[source]
        cause: anyhow::Error,
    },
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::EncodingError {
            msg: error.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::EncodingError {
            msg: error.to_string(),
        }
    }
}
