use anyhow::Result;
use async_trait::async_trait;

#[cfg(not(target_arch = "wasm32"))]
pub trait InvocationSignerConditionalSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<K> InvocationSignerConditionalSendSync for K where K: InvocationSigner + Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait InvocationSignerConditionalSendSync {}

#[cfg(target_arch = "wasm32")]
impl<K> InvocationSignerConditionalSendSync for K where K: InvocationSigner {}

/// This trait must be implemented by a struct that is able to sign on behalf
/// of an invocation key. It is the minimum API needed to sign a capability
/// invocation: the key's identifier, which is presented to the verifier as
/// `keyId`, and an asynchronous signing operation over raw bytes.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait InvocationSigner: InvocationSignerConditionalSendSync {
    /// The identifier of the key that produces signatures, e.g. a DID URL
    fn id(&self) -> String;

    /// Sign some data with this key
    async fn sign(&self, data: &[u8]) -> Result<Vec<u8>>;
}
