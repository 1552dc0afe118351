use crate::{
    capability::{Capability, CapabilityInvocation},
    crypto::InvocationSigner,
    digest::{attach_digest, DigestAlgorithm},
    error::Error,
    headers::{
        ensure_host, normalize_headers, HostHeader, SignedHeaders, AUTHORIZATION,
        CAPABILITY_INVOCATION, HOST,
    },
    signature::{
        included_headers, is_quotable, request_target, signature_string, Authorization,
        SignatureRequest, SIGNATURE_ALGORITHM,
    },
    time::{now, resolve_expiration, to_unix_seconds, SystemTime, DEFAULT_EXPIRATION_WINDOW},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, trace};
use serde_json::Value;
use std::collections::BTreeMap;

/// A signable is a capability invocation that has been validated and has
/// all the state it needs in order to be signed, but has not yet been signed.
#[derive(Debug)]
pub struct Signable<'a, S>
where
    S: InvocationSigner,
{
    pub signer: &'a S,
    pub key_id: String,

    pub url: String,
    pub method: String,
    pub action: String,

    pub headers: BTreeMap<String, String>,
    pub include_headers: Vec<String>,

    pub created: u64,
    pub expires: u64,

    pub host_header: HostHeader,
}

impl<'a, S> Signable<'a, S>
where
    S: InvocationSigner,
{
    /// The request descriptor the signing string is resolved against
    pub fn signature_request(&self) -> SignatureRequest<'_> {
        SignatureRequest {
            url: &self.url,
            method: &self.method,
            headers: &self.headers,
            created: self.created,
            expires: self.expires,
            key_id: &self.key_id,
        }
    }

    /// The exact bytes that will be handed to the signer
    pub fn signing_string(&self) -> Result<String, Error> {
        signature_string(&self.include_headers, &self.signature_request())
    }

    /// Sign the invocation and produce the final header set, including the
    /// `authorization` header. Signer failures are reported with the method,
    /// url and action of the invocation; nothing is returned on failure.
    pub async fn sign(self) -> Result<SignedHeaders, Error> {
        let plaintext = self.signing_string()?;
        trace!("Signing string for {} {}:\n{}", self.method, self.url, plaintext);

        let signature = self
            .signer
            .sign(plaintext.as_bytes())
            .await
            .map_err(|cause| Error::SigningFailure {
                method: self.method.clone(),
                url: self.url.clone(),
                action: self.action.clone(),
                cause,
            })?;

        let authorization = Authorization {
            key_id: self.key_id,
            algorithm: SIGNATURE_ALGORITHM.into(),
            created: self.created,
            expires: self.expires,
            headers: self.include_headers,
            signature: STANDARD.encode(signature),
        };

        let mut headers = self.headers;
        headers.insert(AUTHORIZATION.into(), authorization.to_string());

        if self.host_header == HostHeader::Omit {
            headers.remove(HOST);
        }

        Ok(SignedHeaders::from(headers))
    }
}

/// A builder API for signed capability invocations
#[derive(Debug)]
pub struct InvocationBuilder<'a, S>
where
    S: InvocationSigner,
{
    url: Option<String>,
    method: Option<String>,
    headers: Option<Vec<(String, String)>>,
    json: Option<Value>,

    capability: Option<Capability>,
    action: Option<String>,
    signer: Option<&'a S>,

    created: Option<u64>,
    lifetime: Option<u64>,
    expiration: Option<u64>,

    host_header: HostHeader,
    digest_algorithm: DigestAlgorithm,
}

impl<'a, S> Default for InvocationBuilder<'a, S>
where
    S: InvocationSigner,
{
    /// Create an empty builder.
    /// Before finalising the builder, you need to at least call:
    ///
    /// - `for_url`
    /// - `with_method`
    /// - `with_headers` (possibly with no headers at all)
    /// - `with_action`
    /// - `signed_by`
    ///
    /// To finalise the builder, call its `build` method and sign the result.
    fn default() -> Self {
        InvocationBuilder {
            url: None,
            method: None,
            headers: None,
            json: None,

            capability: None,
            action: None,
            signer: None,

            created: None,
            lifetime: None,
            expiration: None,

            host_header: HostHeader::default(),
            digest_algorithm: DigestAlgorithm::default(),
        }
    }
}

impl<'a, S> InvocationBuilder<'a, S>
where
    S: InvocationSigner,
{
    /// The invocation target. Unless a capability is given explicitly, the
    /// root capability for this URL is invoked.
    pub fn for_url(mut self, url: &str) -> Self {
        self.url = Some(String::from(url));
        self
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(String::from(method));
        self
    }

    /// The headers of the outgoing request. Names are case-insensitive.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .get_or_insert_with(Vec::new)
            .extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    pub fn with_header(self, name: &str, value: &str) -> Self {
        self.with_headers([(name, value)])
    }

    /// The JSON body of the request. A body is digested and the digest is
    /// covered by the signature; `null` counts as no body.
    pub fn with_json(mut self, json: Value) -> Self {
        self.json = match json {
            Value::Null => None,
            json => Some(json),
        };
        self
    }

    /// Invoke a specific capability: an identifier or a capability document
    pub fn invoking<C: Into<Capability>>(mut self, capability: C) -> Self {
        self.capability = Some(capability.into());
        self
    }

    /// The action to perform with the capability
    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(String::from(action));
        self
    }

    /// The key that signs the invocation
    pub fn signed_by(mut self, signer: &'a S) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Set the POSIX timestamp (in seconds) the signature was created at.
    /// Defaults to the time `build` is invoked.
    pub fn created_at(mut self, timestamp: u64) -> Self {
        self.created = Some(timestamp);
        self
    }

    pub fn created_at_time(self, time: SystemTime) -> Self {
        self.created_at(to_unix_seconds(time))
    }

    /// The number of seconds after creation the signature expires. This is
    /// ignored if an explicit expiration is set.
    pub fn with_lifetime(mut self, seconds: u64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Set the POSIX timestamp (in seconds) for when the signature should
    /// expire. Setting this value overrides a configured lifetime value.
    pub fn with_expiration(mut self, timestamp: u64) -> Self {
        self.expiration = Some(timestamp);
        self
    }

    pub fn host_header(mut self, host_header: HostHeader) -> Self {
        self.host_header = host_header;
        self
    }

    pub fn with_digest_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.digest_algorithm = algorithm;
        self
    }

    /// Validate the invocation and assemble every header except
    /// `authorization`. No signing happens here.
    pub fn build(self) -> Result<Signable<'a, S>, Error> {
        let method = match self.method {
            Some(method) if !method.is_empty() => method,
            _ => return Err(Error::InvalidMethod),
        };

        let action = match self.action {
            Some(action) if !action.is_empty() && is_quotable(&action) => action,
            _ => return Err(Error::InvalidCapabilityAction),
        };

        let signer = self.signer.ok_or_else(|| Error::InvalidInvocationSigner {
            msg: "Missing invocation signer".into(),
        })?;
        let key_id = signer.id();
        if key_id.is_empty() {
            return Err(Error::InvalidInvocationSigner {
                msg: "\"invocationSigner.id\" must be a non-empty string".into(),
            });
        }
        if !is_quotable(&key_id) {
            return Err(Error::InvalidInvocationSigner {
                msg: "\"invocationSigner.id\" must not contain quotes or control characters"
                    .into(),
            });
        }

        let url = self.url.ok_or_else(|| Error::InvalidUrl {
            url: String::new(),
            msg: "Missing invocation target".into(),
        })?;

        let capability = self
            .capability
            .unwrap_or_else(|| Capability::root_for(&url))
            .classify()?;

        let mut headers = normalize_headers(self.headers.ok_or_else(|| Error::InvalidHeaders {
            msg: "Missing headers".into(),
        })?)?;
        ensure_host(&mut headers, &url)?;
        request_target(&method, &url)?;

        let invocation = CapabilityInvocation::new(&capability, &action)?;
        headers.insert(CAPABILITY_INVOCATION.into(), invocation.to_string());

        if let Some(json) = &self.json {
            attach_digest(&mut headers, json, self.digest_algorithm)?;
        }

        let created = self.created.unwrap_or_else(now);
        let expires = resolve_expiration(
            created,
            self.expiration,
            self.lifetime.unwrap_or(DEFAULT_EXPIRATION_WINDOW),
        );

        let include_headers = included_headers(self.json.is_some());

        debug!(
            "Prepared invocation of {} for {} {} by {} (headers: {})",
            capability.id(),
            method,
            url,
            key_id,
            include_headers.join(" ")
        );

        Ok(Signable {
            signer,
            key_id,
            url,
            method,
            action,
            headers,
            include_headers,
            created,
            expires,
            host_header: self.host_header,
        })
    }

    /// Shorthand for `build` followed by `Signable::sign`
    pub async fn sign(self) -> Result<SignedHeaders, Error> {
        self.build()?.sign().await
    }
}
