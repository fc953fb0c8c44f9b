//! Resolved address set
//!
//! The immutable, non-empty list of addresses the pool dials into.

use rand::Rng;
use std::net::IpAddr;

/// Non-empty set of resolved addresses, sampled uniformly per dial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSet {
    addrs: Vec<IpAddr>,
}

impl AddressSet {
    /// Wrap resolved addresses, returning `None` when there are none
    pub fn new(addrs: Vec<IpAddr>) -> Option<Self> {
        if addrs.is_empty() {
            None
        } else {
            Some(AddressSet { addrs })
        }
    }

    /// Pick one address uniformly at random
    pub fn pick(&self) -> IpAddr {
        self.pick_with(&mut rand::thread_rng())
    }

    /// Pick one address uniformly at random using `rng`
    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> IpAddr {
        self.addrs[rng.gen_range(0..self.addrs.len())]
    }

    /// Number of addresses
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Always false, the set is never empty
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}
