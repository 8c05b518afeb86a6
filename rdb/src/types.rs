// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Number of bits in an address or mask.
pub const ADDRESS_BITS: u8 = 32;

/// Shift `value` right by `shift` bits. Shifting by the full width or more
/// leaves nothing, which is what a zero length prefix needs.
pub(crate) fn prefix_bits(value: u32, shift: u32) -> u32 {
    value.checked_shr(shift).unwrap_or(0)
}

/// A 32-bit router address in dotted quad form.
#[derive(
    Debug,
    Copy,
    Clone,
    Serialize,
    Deserialize,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(transparent)]
pub struct Address(pub Ipv4Addr);

impl Address {
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self(Ipv4Addr::new(a, b, c, d))
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(Ipv4Addr::from(bits))
    }

    pub fn to_bits(&self) -> u32 {
        u32::from(self.0)
    }

    /// The address of this router's interface on the link shared with
    /// `self`. The first three octets are kept and the last is set to 1.
    /// ```
    /// use rdb::types::Address;
    /// let neighbor: Address = "172.168.0.2".parse().unwrap();
    /// assert_eq!(neighbor.gateway(), Address::new(172, 168, 0, 1));
    /// ```
    pub fn gateway(&self) -> Self {
        let [a, b, c, _] = self.0.octets();
        Self::new(a, b, c, 1)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(Self)
            .map_err(|_| Error::InvalidAddress(s.to_string()))
    }
}

impl From<Ipv4Addr> for Address {
    fn from(value: Ipv4Addr) -> Self {
        Self(value)
    }
}

impl slog::Value for Address {
    fn serialize(
        &self,
        _record: &slog::Record,
        key: slog::Key,
        serializer: &mut dyn slog::Serializer,
    ) -> slog::Result {
        serializer.emit_arguments(key, &format_args!("{}", self.0))
    }
}

/// A subnet mask. Only contiguous runs of leading ones are representable.
#[derive(
    Debug,
    Copy,
    Clone,
    Serialize,
    Deserialize,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(try_from = "Ipv4Addr", into = "Ipv4Addr")]
pub struct Mask(Ipv4Addr);

impl Mask {
    pub fn new(value: Ipv4Addr) -> Result<Self, Error> {
        let mask = Self(value);
        if Self::from_length(mask.length()) != mask {
            return Err(Error::InvalidMask(value));
        }
        Ok(mask)
    }

    /// Build the mask with `length` leading ones. Lengths beyond 32 are
    /// clamped.
    pub fn from_length(length: u8) -> Self {
        let length = length.min(ADDRESS_BITS);
        let bits = match length {
            0 => 0,
            _ => (!0u32) << (ADDRESS_BITS - length),
        };
        Self(Ipv4Addr::from(bits))
    }

    pub fn to_bits(&self) -> u32 {
        u32::from(self.0)
    }

    /// Count of leading one bits.
    pub fn length(&self) -> u8 {
        u32::from(self.0).leading_ones() as u8
    }

    /// Number of low order bits outside the prefix.
    pub fn shift(&self) -> u8 {
        ADDRESS_BITS - self.length()
    }
}

impl Display for Mask {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<Ipv4Addr> for Mask {
    type Error = Error;

    fn try_from(value: Ipv4Addr) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mask> for Ipv4Addr {
    fn from(value: Mask) -> Self {
        value.0
    }
}

impl FromStr for Mask {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr: Ipv4Addr =
            s.parse().map_err(|_| Error::InvalidAddress(s.to_string()))?;
        Self::new(addr)
    }
}

/// A network prefix as carried by withdrawals.
#[derive(
    Debug,
    Copy,
    Clone,
    Serialize,
    Deserialize,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
)]
pub struct NetworkDescription {
    pub network: Address,
    pub netmask: Mask,
}

impl Display for NetworkDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.netmask.length())
    }
}

/// The public part of an announcement, as propagated to neighbors.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct RouteAnnouncement {
    pub network: Address,
    pub netmask: Mask,
    #[serde(rename = "ASPath")]
    pub as_path: Vec<u32>,
}

impl RouteAnnouncement {
    /// The announcement as re-advertised by the router with number `asn`.
    pub fn prepend(&self, asn: u32) -> Self {
        let mut as_path = Vec::with_capacity(self.as_path.len() + 1);
        as_path.push(asn);
        as_path.extend_from_slice(&self.as_path);
        Self {
            network: self.network,
            netmask: self.netmask,
            as_path,
        }
    }
}

/// Where a route originated. `Local` is preferred over `Remote`, which is
/// preferred over `Unknown`.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum Origin {
    #[serde(rename = "IGP")]
    Local,
    #[serde(rename = "EGP")]
    Remote,
    #[serde(rename = "UNK")]
    Unknown,
}

impl Origin {
    fn rank(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Remote => 1,
            Self::Local => 2,
        }
    }
}

impl PartialOrd for Origin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Origin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "IGP"),
            Self::Remote => write!(f, "EGP"),
            Self::Unknown => write!(f, "UNK"),
        }
    }
}

impl FromStr for Origin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IGP" => Ok(Self::Local),
            "EGP" => Ok(Self::Remote),
            "UNK" => Ok(Self::Unknown),
            _ => Err(Error::InvalidOrigin(s.to_string())),
        }
    }
}

/// A route as stored in the RIB.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct Route {
    pub network: Address,
    pub netmask: Mask,
    #[serde(rename = "ASPath")]
    pub as_path: Vec<u32>,
    #[serde(rename = "localpref")]
    pub local_pref: u32,
    #[serde(rename = "selfOrigin")]
    pub self_originated: bool,
    pub origin: Origin,
}

// Routes are ordered field by field so that both RIB iteration and the
// choice of representative during aggregation are deterministic.
impl PartialOrd for Route {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Route {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.network != other.network {
            return self.network.cmp(&other.network);
        }
        if self.netmask != other.netmask {
            return self.netmask.cmp(&other.netmask);
        }
        if self.as_path != other.as_path {
            return self.as_path.cmp(&other.as_path);
        }
        if self.local_pref != other.local_pref {
            return self.local_pref.cmp(&other.local_pref);
        }
        if self.self_originated != other.self_originated {
            return self.self_originated.cmp(&other.self_originated);
        }
        self.origin.cmp(&other.origin)
    }
}

impl Route {
    pub fn description(&self) -> NetworkDescription {
        NetworkDescription {
            network: self.network,
            netmask: self.netmask,
        }
    }

    pub fn announcement(&self) -> RouteAnnouncement {
        RouteAnnouncement {
            network: self.network,
            netmask: self.netmask,
            as_path: self.as_path.clone(),
        }
    }

    /// If `destination` falls within this route's prefix, return the prefix
    /// length. A zero length prefix matches every destination.
    pub fn matches(&self, destination: Address) -> Option<u8> {
        let shift = u32::from(self.netmask.shift());
        if prefix_bits(self.network.to_bits(), shift)
            == prefix_bits(destination.to_bits(), shift)
        {
            Some(self.netmask.length())
        } else {
            None
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} as_path={:?} localpref={} self_origin={} origin={}",
            self.description(),
            self.as_path,
            self.local_pref,
            self.self_originated,
            self.origin,
        )
    }
}

/// One line of an administrative table dump: an aggregated route and the
/// neighbor it is reached through.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SnapshotEntry {
    #[serde(flatten)]
    pub route: Route,
    pub peer: Address,
}

/// The business relationship with a neighbor.
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq, Hash,
)]
pub enum Relationship {
    #[serde(rename = "cust")]
    Customer,
    #[serde(rename = "peer")]
    Peer,
    #[serde(rename = "prov")]
    Provider,
}

impl Display for Relationship {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "cust"),
            Self::Peer => write!(f, "peer"),
            Self::Provider => write!(f, "prov"),
        }
    }
}

impl FromStr for Relationship {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cust" => Ok(Self::Customer),
            "peer" => Ok(Self::Peer),
            "prov" => Ok(Self::Provider),
            _ => Err(Error::InvalidRelationship(s.to_string())),
        }
    }
}
