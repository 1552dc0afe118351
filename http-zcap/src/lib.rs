#![warn(missing_debug_implementations, rust_2018_idioms)]

//! http-zcap
//!
//! Attach a capability invocation to an outgoing HTTP request. The request
//! is signed following the HTTP Signatures scheme over a fixed, ordered set
//! of headers and pseudo-headers, and the capability being invoked travels
//! in the `capability-invocation` header: root capabilities by identifier,
//! delegated capabilities embedded as a compressed, encoded document.
//!
//! ```no_run
//! # async fn run(signer: &impl http_zcap::crypto::InvocationSigner) -> Result<(), http_zcap::error::Error> {
//! use http_zcap::builder::InvocationBuilder;
//! use serde_json::json;
//!
//! let signed = InvocationBuilder::default()
//!     .for_url("https://example.org/read/foo")
//!     .with_method("POST")
//!     .with_headers([("date", "Tue, 07 Jun 2022 20:51:35 GMT")])
//!     .with_json(json!({ "foo": true }))
//!     .with_action("read")
//!     .signed_by(signer)
//!     .build()?
//!     .sign()
//!     .await?;
//!
//! assert!(signed.get("authorization").is_some());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod capability;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod headers;
pub mod signature;
pub mod time;

#[cfg(test)]
mod tests;
