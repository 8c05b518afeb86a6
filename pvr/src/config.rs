// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use rdb::{Address, Relationship};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouterConfig {
    /// The autonomous system number of this router.
    pub asn: u32,
    pub neighbors: Vec<NeighborConfig>,
}

/// A neighbor as given on the command line: `<port>-<address>-<relationship>`,
/// for example `7833-192.168.0.2-cust`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NeighborConfig {
    /// Local port the neighbor listens on.
    pub port: u16,
    /// The neighbor's address on the shared network.
    pub address: Address,
    pub relationship: Relationship,
}

impl FromStr for NeighborConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNeighbor(s.to_string());

        let mut parts = s.splitn(3, '-');
        let (Some(port), Some(address), Some(relationship)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            port: port.parse().map_err(|_| invalid())?,
            address: address.parse().map_err(|_| invalid())?,
            relationship: relationship.parse().map_err(|_| invalid())?,
        })
    }
}

impl Display for NeighborConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.port, self.address, self.relationship)
    }
}
