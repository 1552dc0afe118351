use crate::{
    capability::{
        decode_capability, encode_capability, Capability, CapabilityDocument,
        CapabilityInvocation, CapabilityReference, ResolvedCapability,
    },
    error::Error,
    tests::fixtures::{delegated_capability, root_capability, TEST_ROOT_CAPABILITY, TEST_URL},
};
use serde_json::json;

#[test]
fn it_derives_the_root_capability_of_a_url() {
    assert_eq!(
        Capability::root_for(TEST_URL),
        Capability::Id(TEST_ROOT_CAPABILITY.into())
    );
}

#[test]
fn it_classifies_capabilities() {
    let by_id = Capability::from("urn:zcap:root:foo").classify().unwrap();
    assert_eq!(by_id, ResolvedCapability::RootById("urn:zcap:root:foo".into()));

    let root = Capability::try_from(root_capability())
        .unwrap()
        .classify()
        .unwrap();
    assert_eq!(root, ResolvedCapability::RootById(TEST_ROOT_CAPABILITY.into()));

    let delegated = Capability::try_from(delegated_capability())
        .unwrap()
        .classify()
        .unwrap();
    assert!(matches!(delegated, ResolvedCapability::Delegated(_)));
    assert_eq!(
        delegated.id(),
        "urn:uuid:8d3a2b4e-2f3c-4a7e-9b0e-6f1d2c3b4a5e"
    );
}

#[test]
fn it_encodes_the_root_id_like_a_uri_component() {
    assert_eq!(
        Capability::root_for("https://example.org/items/it's(1)!*~"),
        Capability::Id(
            "urn:zcap:root:https%3A%2F%2Fexample.org%2Fitems%2Fit's(1)!*~".into()
        )
    );
    assert_eq!(
        Capability::root_for("https://example.org/a b?q=1&r=é#top"),
        Capability::Id(
            "urn:zcap:root:https%3A%2F%2Fexample.org%2Fa%20b%3Fq%3D1%26r%3D%C3%A9%23top".into()
        )
    );
}

#[test]
fn it_treats_an_empty_parent_as_a_root_capability() {
    for parent in [json!(null), json!(false), json!(0), json!("")] {
        let capability = Capability::try_from(json!({
            "id": "urn:zcap:root:foo",
            "parentCapability": parent
        }))
        .unwrap();

        assert_eq!(
            capability.classify().unwrap(),
            ResolvedCapability::RootById("urn:zcap:root:foo".into())
        );
    }

    let delegated = Capability::try_from(json!({
        "id": "urn:uuid:1",
        "parentCapability": { "id": "urn:zcap:root:foo" }
    }))
    .unwrap();
    assert!(matches!(
        delegated.classify().unwrap(),
        ResolvedCapability::Delegated(_)
    ));
}

#[test]
fn it_rejects_ids_that_cannot_be_quoted() {
    for id in ["urn:zcap:\"root", "urn:zcap:root:foo\nhost: evil.org", "urn:\\x"] {
        assert!(matches!(
            Capability::from(id).classify(),
            Err(Error::InvalidCapability { .. })
        ));
    }
}

#[test]
fn it_rejects_unusable_capabilities() {
    for value in [json!(null), json!(42), json!(["urn:zcap:root:foo"]), json!({})] {
        assert!(matches!(
            Capability::try_from(value),
            Err(Error::InvalidCapability { .. })
        ));
    }

    assert!(matches!(
        Capability::from("").classify(),
        Err(Error::InvalidCapability { .. })
    ));

    let nameless = Capability::try_from(json!({
        "id": "",
        "parentCapability": TEST_ROOT_CAPABILITY
    }))
    .unwrap();
    assert!(matches!(
        nameless.classify(),
        Err(Error::InvalidCapability { .. })
    ));
}

#[test]
fn it_round_trips_an_embedded_capability() {
    let original = delegated_capability();
    let document: CapabilityDocument = serde_json::from_value(original.clone()).unwrap();

    let encoded = encode_capability(&document).unwrap();
    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

    let decoded = decode_capability(&encoded).unwrap();
    assert_eq!(decoded, document);
    assert_eq!(serde_json::to_value(decoded).unwrap(), original);
}

#[test]
fn it_fails_to_decode_garbage() {
    assert!(matches!(
        decode_capability("not*base64"),
        Err(Error::EncodingError { .. })
    ));
    assert!(matches!(
        decode_capability("bm90IGd6aXA"),
        Err(Error::EncodingError { .. })
    ));
}

#[test]
fn it_formats_invocation_headers() {
    let root = ResolvedCapability::RootById(TEST_ROOT_CAPABILITY.into());
    let invocation = CapabilityInvocation::new(&root, "read").unwrap();

    assert_eq!(
        invocation.to_string(),
        format!("zcap id=\"{TEST_ROOT_CAPABILITY}\",action=\"read\"")
    );

    let without_action = CapabilityInvocation {
        capability: CapabilityReference::Id(TEST_ROOT_CAPABILITY.into()),
        action: None,
    };
    assert_eq!(
        without_action.to_string(),
        format!("zcap id=\"{TEST_ROOT_CAPABILITY}\"")
    );
}

#[test]
fn it_parses_invocation_headers() {
    let parsed: CapabilityInvocation = format!("zcap id=\"{TEST_ROOT_CAPABILITY}\",action=\"read\"")
        .parse()
        .unwrap();
    assert_eq!(
        parsed.capability,
        CapabilityReference::Id(TEST_ROOT_CAPABILITY.into())
    );
    assert_eq!(parsed.action.as_deref(), Some("read"));
    assert_eq!(parsed.capability_document().unwrap(), None);

    let parsed: CapabilityInvocation = "zcap id=\"urn:zcap:root:foo\"".parse().unwrap();
    assert_eq!(parsed.action, None);

    for malformed in [
        "Bearer id=\"urn:zcap:root:foo\"",
        "zcap action=\"read\"",
        "zcap id=\"urn:zcap:root:foo",
    ] {
        assert!(matches!(
            malformed.parse::<CapabilityInvocation>(),
            Err(Error::MalformedHeader { .. })
        ));
    }
}
