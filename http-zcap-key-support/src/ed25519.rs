use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ed25519_zebra::{
    Signature, SigningKey as Ed25519PrivateKey, VerificationKey as Ed25519PublicKey,
};

use http_zcap::crypto::InvocationSigner;
use std::fmt;

pub const ED25519_MAGIC_BYTES: &[u8] = &[0xed, 0x01];

/// An Ed25519 invocation key. Its key id is the `did:key` of the public key
/// with the key's own fingerprint as fragment, e.g. `did:key:z6Mk...#z6Mk...`.
pub struct Ed25519InvocationKey(pub Ed25519PublicKey, pub Option<Ed25519PrivateKey>);

impl Ed25519InvocationKey {
    pub fn new(private_key: Ed25519PrivateKey) -> Self {
        Ed25519InvocationKey(Ed25519PublicKey::from(&private_key), Some(private_key))
    }

    /// A key that can only verify
    pub fn from_public_key(public_key: Ed25519PublicKey) -> Self {
        Ed25519InvocationKey(public_key, None)
    }

    /// The multibase (base58btc) encoded multicodec public key
    pub fn fingerprint(&self) -> String {
        let bytes = [ED25519_MAGIC_BYTES, self.0.as_ref()].concat();
        format!("z{}", bs58::encode(bytes).into_string())
    }

    pub fn did(&self) -> String {
        format!("did:key:{}", self.fingerprint())
    }

    /// Verify the alleged signature of some data against this key
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<()> {
        let signature = Signature::try_from(signature)?;
        self.0
            .verify(&signature, payload)
            .map_err(|error| anyhow!(error))
    }
}

impl fmt::Debug for Ed25519InvocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519InvocationKey")
            .field("did", &self.did())
            .field("can_sign", &self.1.is_some())
            .finish()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl InvocationSigner for Ed25519InvocationKey {
    fn id(&self) -> String {
        format!("{}#{}", self.did(), self.fingerprint())
    }

    async fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        match &self.1 {
            Some(private_key) => {
                debug!("Signing {} bytes with {}", data.len(), self.did());
                let signature = private_key.sign(data);
                let bytes: [u8; 64] = signature.into();
                Ok(bytes.to_vec())
            }
            None => Err(anyhow!("No private key; cannot sign data")),
        }
    }
}
