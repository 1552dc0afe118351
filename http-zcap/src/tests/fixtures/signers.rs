use crate::crypto::InvocationSigner;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_KEY_ID: &str =
    "did:key:z6MkgYGF3thn8k1Fv4p4dWXKtsXCnLH7q9yw4QgNPULDmDKB#z6MkgYGF3thn8k1Fv4p4dWXKtsXCnLH7q9yw4QgNPULDmDKB";

/// "Signs" by hashing, so tests can recompute the expected signature
pub struct HashSigner {
    pub id: String,
}

impl Default for HashSigner {
    fn default() -> Self {
        HashSigner {
            id: TEST_KEY_ID.into(),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl InvocationSigner for HashSigner {
    fn id(&self) -> String {
        self.id.clone()
    }

    async fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(Sha256::digest(data).to_vec())
    }
}

pub struct FailingSigner;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl InvocationSigner for FailingSigner {
    fn id(&self) -> String {
        TEST_KEY_ID.into()
    }

    async fn sign(&self, _data: &[u8]) -> Result<Vec<u8>> {
        Err(anyhow!("key service unavailable"))
    }
}

/// Counts how often it was asked to sign
#[derive(Default)]
pub struct CountingSigner {
    calls: AtomicUsize,
}

impl CountingSigner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl InvocationSigner for CountingSigner {
    fn id(&self) -> String {
        TEST_KEY_ID.into()
    }

    async fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(data.to_vec())
    }
}
