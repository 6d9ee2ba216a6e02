//! Tests for Link and Node entities

use std::net::Ipv6Addr;

use meshtk::domain::{link_key, FakeMeshConnection, Link, Location, Node, Version};

#[test]
fn given_tq_when_computing_percent_then_reciprocal() {
    let link = Link::new("a", "b", true, 1.337, false);

    assert!((link.tq_percent() - 0.7479431563201197).abs() < 0.0001);
}

#[test]
fn given_link_and_reverse_when_keying_then_identical_keys() {
    let forward = Link::new("62d703f9b069", "18a6f72b7c36", true, 1.0, false);
    let reverse = Link::new("18a6f72b7c36", "62d703f9b069", true, 1.0, false);

    assert_eq!(forward.key(), "18a6f72b7c36-62d703f9b069");
    assert_eq!(forward.key(), reverse.key());
    assert_eq!(link_key("Bb", "aa"), "aa-Bb");
}

#[test]
fn given_link_when_asking_other_endpoint_then_returns_opposite_or_none() {
    let link = Link::new("a", "b", false, 1.0, true);

    assert_eq!(link.other_endpoint("a"), Some("b"));
    assert_eq!(link.other_endpoint("b"), Some("a"));
    assert_eq!(link.other_endpoint("c"), None);
}

#[test]
fn given_fake_mesh_pair_when_created_in_either_order_then_equal() {
    let ab = FakeMeshConnection::new("a0f3c112e932", "02caffee0001");
    let ba = FakeMeshConnection::new("02caffee0001", "a0f3c112e932");

    assert_eq!(ab, ba);
    assert_eq!(ab.endpoints(), ("02caffee0001", "a0f3c112e932"));
    assert_eq!(ab.to_string(), "02caffee0001 <-> a0f3c112e932");
}

#[test]
fn given_ids_equal_up_to_case_when_keying_then_order_is_stable() {
    assert_eq!(link_key("AB", "ab"), "AB-ab");
    assert_eq!(link_key("ab", "AB"), "AB-ab");
    assert_eq!(
        FakeMeshConnection::new("ab", "AB"),
        FakeMeshConnection::new("AB", "ab")
    );
    assert_eq!(FakeMeshConnection::new("ab", "AB").endpoints(), ("AB", "ab"));
}

#[test]
fn given_node_with_optional_fields_when_built_then_fields_are_set() {
    let node = Node::new("a0f3c112e932", false, true)
        .with_version(Version::parse("0.14f-20170411").ok())
        .with_client_count(Some(3))
        .with_hostname(Some("ff-kirchplatz".to_string()))
        .with_location(Some(Location {
            latitude: 48.1,
            longitude: 11.5,
        }))
        .with_ipv6("2001:db8::1".parse::<Ipv6Addr>().ok());

    assert_eq!(node.version.as_ref().map(|v| v.minor()), Some("14"));
    assert_eq!(node.client_count, Some(3));
    assert_eq!(node.hostname.as_deref(), Some("ff-kirchplatz"));
    assert_eq!(node.location.map(|l| l.latitude), Some(48.1));
    assert!(node.ipv6.is_some());
    assert!(node.cached_neighbours().is_none());
}
