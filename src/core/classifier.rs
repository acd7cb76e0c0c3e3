//! Address classification policies
//!
//! Two deployments exist. One lists every non-circulating address explicitly
//! (vesting token, solver rewards, DAO treasury); the other only excludes a
//! single vesting contract. Both implement [`ExclusionPolicy`], and
//! [`Exclusion`] picks between them at runtime when the policy comes from
//! configuration.

use crate::core::traits::ExclusionPolicy;
use crate::types::Address;
use std::collections::HashSet;

/// Exclusion by membership in a fixed address set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitExclusion {
    addresses: HashSet<Address>,
}

impl ExplicitExclusion {
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        ExplicitExclusion {
            addresses: addresses.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }
}

impl ExclusionPolicy for ExplicitExclusion {
    fn is_excluded(&self, address: &Address) -> bool {
        self.contains(address)
    }
}

/// Exclusion of exactly one vesting contract address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingContract {
    address: Address,
}

impl VestingContract {
    pub fn new(address: Address) -> Self {
        VestingContract { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl ExclusionPolicy for VestingContract {
    fn is_excluded(&self, address: &Address) -> bool {
        *address == self.address
    }
}

/// Either exclusion variant, chosen at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    Explicit(ExplicitExclusion),
    Vesting(VestingContract),
}

impl ExclusionPolicy for Exclusion {
    fn is_excluded(&self, address: &Address) -> bool {
        match self {
            Exclusion::Explicit(policy) => policy.is_excluded(address),
            Exclusion::Vesting(policy) => policy.is_excluded(address),
        }
    }
}

impl From<ExplicitExclusion> for Exclusion {
    fn from(policy: ExplicitExclusion) -> Self {
        Exclusion::Explicit(policy)
    }
}

impl From<VestingContract> for Exclusion {
    fn from(policy: VestingContract) -> Self {
        Exclusion::Vesting(policy)
    }
}
