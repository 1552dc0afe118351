use serde_json::{json, Value};

/// A root capability document for `TEST_URL`
pub fn root_capability() -> Value {
    json!({
        "@context": "https://w3id.org/zcap/v1",
        "id": super::TEST_ROOT_CAPABILITY,
        "controller": "did:test:controller",
        "invocationTarget": super::TEST_URL
    })
}

/// A capability delegated from the root capability of `TEST_URL`
pub fn delegated_capability() -> Value {
    json!({
        "@context": [
            "https://w3id.org/zcap/v1",
            "https://w3id.org/security/suites/ed25519-2020/v1"
        ],
        "id": "urn:uuid:8d3a2b4e-2f3c-4a7e-9b0e-6f1d2c3b4a5e",
        "controller": "did:key:z6MkgYGF3thn8k1Fv4p4dWXKtsXCnLH7q9yw4QgNPULDmDKB",
        "parentCapability": super::TEST_ROOT_CAPABILITY,
        "invocationTarget": super::TEST_URL,
        "expires": "2030-01-01T00:00:00Z",
        "proof": {
            "type": "Ed25519Signature2020",
            "created": "2022-06-07T20:51:35Z",
            "verificationMethod": "did:test:controller#key-1",
            "proofPurpose": "capabilityDelegation",
            "capabilityChain": [super::TEST_ROOT_CAPABILITY],
            "proofValue": "z5Gv2bZ7sSnWbKJZLc3xnUm6sRmBtHCn7x9bRU8o4H8Ex2oMLNYRa9R1oRn4XbP3uYQHJTFxsb1sPEDGRMXJVqhXj"
        }
    })
}
