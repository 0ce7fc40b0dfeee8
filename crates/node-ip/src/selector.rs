//! Node IP selection with default-route fallback and optional retry.

use common::{Error, Result};
use routing::{AddressFilter, valid_node_address};
use std::net::IpAddr;
use tracing::{debug, error, info};

use crate::resolver::{AddressResolver, Sleeper};
use crate::types::{ChosenAddress, RetryPolicy, VirtualIp};

/// Picks the node IP for a set of VIPs.
pub struct NodeIpSelector<'a, R: ?Sized, S: ?Sized> {
    resolver: &'a R,
    sleeper: &'a S,
    filter: AddressFilter,
}

impl<'a, R, S> NodeIpSelector<'a, R, S>
where
    R: AddressResolver + ?Sized,
    S: Sleeper + ?Sized,
{
    pub fn new(resolver: &'a R, sleeper: &'a S) -> Self {
        Self {
            resolver,
            sleeper,
            filter: valid_node_address,
        }
    }

    /// Replace the address validity filter.
    pub fn with_filter(mut self, filter: AddressFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Select the node IP.
    ///
    /// Addresses routing to the VIPs win; otherwise the default route is used.
    /// With retry enabled this only returns once a candidate exists or the
    /// resolver fails. Resolver errors are never retried.
    pub fn select(&self, vips: &[VirtualIp], policy: RetryPolicy) -> Result<ChosenAddress> {
        let targets: Vec<IpAddr> = vips.iter().map(VirtualIp::addr).collect();
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;

            if let Some(chosen) = self.attempt(&targets)? {
                info!(address = %chosen, attempt, "Chosen Node IP");
                return Ok(chosen);
            }

            if !policy.retry_on_failure {
                return Err(Error::NoSuitableAddress);
            }

            error!(attempt, "Failed to find a suitable node IP");
            self.sleeper.sleep(policy.interval());
        }
    }

    fn attempt(&self, targets: &[IpAddr]) -> Result<Option<ChosenAddress>> {
        let mut candidates = Vec::new();

        if !targets.is_empty() {
            candidates = self.resolver.addresses_routing_to(targets, self.filter)?;
            debug!(?candidates, "VIP-routed candidates");
        }

        if candidates.is_empty() {
            candidates = self.resolver.addresses_on_default_route(self.filter)?;
            debug!(?candidates, "Default route candidates");
        }

        Ok(candidates.first().copied().map(ChosenAddress::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays scripted answers for each query kind.
    #[derive(Default)]
    struct Scripted {
        routing: RefCell<VecDeque<Result<Vec<IpAddr>>>>,
        default: RefCell<VecDeque<Result<Vec<IpAddr>>>>,
        routing_calls: Cell<usize>,
        default_calls: Cell<usize>,
    }

    impl AddressResolver for Scripted {
        fn addresses_routing_to(&self, _: &[IpAddr], _: AddressFilter) -> Result<Vec<IpAddr>> {
            self.routing_calls.set(self.routing_calls.get() + 1);
            self.routing.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
        }

        fn addresses_on_default_route(&self, _: AddressFilter) -> Result<Vec<IpAddr>> {
            self.default_calls.set(self.default_calls.get() + 1);
            self.default.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
        }
    }

    #[derive(Default)]
    struct CountingSleeper {
        pauses: RefCell<Vec<Duration>>,
    }

    impl Sleeper for CountingSleeper {
        fn sleep(&self, duration: Duration) {
            self.pauses.borrow_mut().push(duration);
        }
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn vip(s: &str) -> VirtualIp {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_vips_skips_routing_query() {
        let resolver = Scripted::default();
        resolver.default.borrow_mut().push_back(Ok(vec![ip("10.1.1.1")]));
        let sleeper = CountingSleeper::default();

        let chosen = NodeIpSelector::new(&resolver, &sleeper)
            .select(&[], RetryPolicy::default())
            .unwrap();

        assert_eq!(chosen.addr(), ip("10.1.1.1"));
        assert_eq!(resolver.routing_calls.get(), 0);
        assert_eq!(resolver.default_calls.get(), 1);
    }

    #[test]
    fn test_first_candidate_wins_without_resorting() {
        let resolver = Scripted::default();
        resolver
            .routing
            .borrow_mut()
            .push_back(Ok(vec![ip("192.168.1.20"), ip("192.168.1.10")]));
        let sleeper = CountingSleeper::default();

        let chosen = NodeIpSelector::new(&resolver, &sleeper)
            .select(&[vip("192.168.1.5")], RetryPolicy::default())
            .unwrap();

        assert_eq!(chosen.addr(), ip("192.168.1.20"));
        assert_eq!(resolver.default_calls.get(), 0);
    }

    #[test]
    fn test_resolver_error_aborts_retry() {
        let resolver = Scripted::default();
        resolver
            .routing
            .borrow_mut()
            .push_back(Err(Error::netlink("Failed to dump routes")));
        let sleeper = CountingSleeper::default();

        let err = NodeIpSelector::new(&resolver, &sleeper)
            .select(&[vip("10.0.0.5")], RetryPolicy::new(true))
            .unwrap_err();

        assert!(matches!(err, Error::Netlink(_)));
        assert_eq!(resolver.default_calls.get(), 0);
        assert!(sleeper.pauses.borrow().is_empty());
    }

    #[test]
    fn test_retry_pauses_between_attempts() {
        let resolver = Scripted::default();
        {
            let mut default = resolver.default.borrow_mut();
            default.push_back(Ok(Vec::new()));
            default.push_back(Ok(Vec::new()));
            default.push_back(Ok(vec![ip("10.1.1.1")]));
        }
        let sleeper = CountingSleeper::default();

        let chosen = NodeIpSelector::new(&resolver, &sleeper)
            .select(&[vip("10.0.0.5")], RetryPolicy::new(true))
            .unwrap();

        assert_eq!(chosen.addr(), ip("10.1.1.1"));
        assert_eq!(resolver.routing_calls.get(), 3);
        assert_eq!(resolver.default_calls.get(), 3);
        assert_eq!(*sleeper.pauses.borrow(), vec![Duration::from_secs(1); 2]);
    }

    #[test]
    fn test_custom_filter_is_passed_through() {
        struct FilterProbe;

        impl AddressResolver for FilterProbe {
            fn addresses_routing_to(&self, _: &[IpAddr], _: AddressFilter) -> Result<Vec<IpAddr>> {
                Ok(Vec::new())
            }

            fn addresses_on_default_route(&self, filter: AddressFilter) -> Result<Vec<IpAddr>> {
                let probe = routing::Address {
                    link_index: 2,
                    address: "10.1.1.1".parse().unwrap(),
                    prefix_len: 24,
                    flags: 0,
                };
                Ok(if filter(&probe) { vec![probe.address] } else { Vec::new() })
            }
        }

        fn reject_all(_: &routing::Address) -> bool {
            false
        }

        let sleeper = CountingSleeper::default();
        let result = NodeIpSelector::new(&FilterProbe, &sleeper)
            .with_filter(reject_all)
            .select(&[], RetryPolicy::default());
        assert!(matches!(result, Err(Error::NoSuitableAddress)));

        let chosen = NodeIpSelector::new(&FilterProbe, &sleeper)
            .select(&[], RetryPolicy::default())
            .unwrap();
        assert_eq!(chosen.addr(), ip("10.1.1.1"));
    }
}
