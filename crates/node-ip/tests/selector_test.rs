//! Integration tests for node IP selection

use common::{Error, Result};
use mockall::mock;
use mockall::predicate::eq;
use node_ip::{
    AddressFilter, AddressResolver, NodeIpSelector, RetryPolicy, Sleeper, VirtualIp, parse_vips,
};
use std::net::IpAddr;
use std::time::Duration;

mock! {
    pub Resolver {}

    impl AddressResolver for Resolver {
        fn addresses_routing_to(&self, targets: &[IpAddr], filter: AddressFilter) -> Result<Vec<IpAddr>>;
        fn addresses_on_default_route(&self, filter: AddressFilter) -> Result<Vec<IpAddr>>;
    }
}

mock! {
    pub Pause {}

    impl Sleeper for Pause {
        fn sleep(&self, duration: Duration);
    }
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn vips(args: &[&str]) -> Vec<VirtualIp> {
    parse_vips(args).unwrap()
}

/// A sleeper that must never be called
fn no_sleep() -> MockPause {
    let mut sleeper = MockPause::new();
    sleeper.expect_sleep().never();
    sleeper
}

#[test]
fn test_vip_routed_candidate_wins() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_addresses_routing_to()
        .withf(|targets, _| targets.to_vec() == vec![ip("10.0.0.5"), ip("10.0.0.6")])
        .times(1)
        .returning(|_, _| Ok(vec![ip("192.168.1.10"), ip("192.168.1.11")]));
    resolver.expect_addresses_on_default_route().never();
    let sleeper = no_sleep();

    let chosen = NodeIpSelector::new(&resolver, &sleeper)
        .select(&vips(&["10.0.0.5", "10.0.0.6"]), RetryPolicy::default())
        .unwrap();

    assert_eq!(chosen.addr(), ip("192.168.1.10"));
}

#[test]
fn test_falls_back_to_default_route() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_addresses_routing_to()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    resolver
        .expect_addresses_on_default_route()
        .times(1)
        .returning(|_| Ok(vec![ip("10.1.1.1"), ip("10.1.1.2")]));
    let sleeper = no_sleep();

    let chosen = NodeIpSelector::new(&resolver, &sleeper)
        .select(&vips(&["10.0.0.5"]), RetryPolicy::default())
        .unwrap();

    assert_eq!(chosen.addr(), ip("10.1.1.1"));
}

#[test]
fn test_empty_vips_only_queries_default_route() {
    let mut resolver = MockResolver::new();
    resolver.expect_addresses_routing_to().never();
    resolver
        .expect_addresses_on_default_route()
        .times(1)
        .returning(|_| Ok(vec![ip("fd00::10")]));
    let sleeper = no_sleep();

    let chosen = NodeIpSelector::new(&resolver, &sleeper)
        .select(&[], RetryPolicy::default())
        .unwrap();

    assert_eq!(chosen.to_string(), "fd00::10");
}

#[test]
fn test_no_candidates_without_retry_fails_immediately() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_addresses_routing_to()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    resolver
        .expect_addresses_on_default_route()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let sleeper = no_sleep();

    let result = NodeIpSelector::new(&resolver, &sleeper)
        .select(&vips(&["10.0.0.5"]), RetryPolicy::new(false));

    assert!(matches!(result, Err(Error::NoSuitableAddress)));
}

#[test]
fn test_retry_until_third_attempt_succeeds() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_addresses_routing_to()
        .times(3)
        .returning(|_, _| Ok(Vec::new()));

    let mut calls = 0;
    resolver
        .expect_addresses_on_default_route()
        .times(3)
        .returning(move |_| {
            calls += 1;
            if calls < 3 {
                Ok(Vec::new())
            } else {
                Ok(vec![ip("10.1.1.1")])
            }
        });

    let mut sleeper = MockPause::new();
    sleeper
        .expect_sleep()
        .with(eq(Duration::from_secs(1)))
        .times(2)
        .return_const(());

    let chosen = NodeIpSelector::new(&resolver, &sleeper)
        .select(&vips(&["10.0.0.5"]), RetryPolicy::new(true))
        .unwrap();

    assert_eq!(chosen.addr(), ip("10.1.1.1"));
}

#[test]
fn test_vip_route_appearing_later_is_picked_up() {
    let mut resolver = MockResolver::new();
    let mut calls = 0;
    resolver
        .expect_addresses_routing_to()
        .times(2)
        .returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(Vec::new())
            } else {
                Ok(vec![ip("192.168.1.10")])
            }
        });
    resolver
        .expect_addresses_on_default_route()
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let mut sleeper = MockPause::new();
    sleeper.expect_sleep().times(1).return_const(());

    let chosen = NodeIpSelector::new(&resolver, &sleeper)
        .select(&vips(&["10.0.0.5"]), RetryPolicy::new(true))
        .unwrap();

    assert_eq!(chosen.addr(), ip("192.168.1.10"));
}

#[test]
fn test_resolver_failure_is_not_retried() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_addresses_routing_to()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    resolver
        .expect_addresses_on_default_route()
        .times(1)
        .returning(|_| Err(Error::netlink("Failed to receive netlink message")));
    let sleeper = no_sleep();

    let result = NodeIpSelector::new(&resolver, &sleeper)
        .select(&vips(&["10.0.0.5"]), RetryPolicy::new(true));

    match result {
        Err(Error::Netlink(msg)) => assert!(msg.contains("receive")),
        other => panic!("expected Netlink error, got {:?}", other),
    }
}
