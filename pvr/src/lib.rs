// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod config;
pub mod connection;
pub mod connection_udp;
pub mod dispatcher;
pub mod error;
pub mod log;
pub mod messages;
pub mod policy;
pub mod router;

#[cfg(test)]
#[macro_use]
extern crate lazy_static;


#[cfg(test)]
pub mod connection_channel;

pub const COMPONENT_PVR: &str = "pvr";
pub const MOD_ROUTER: &str = "router";
pub const MOD_NEIGHBOR: &str = "neighbor";

/// How long the dispatcher waits for a neighbor to become readable before
/// checking for shutdown.
// XXX: Make this configurable
pub const IO_TIMEOUT: std::time::Duration =
    std::time::Duration::from_millis(100);

/// Neighbors are reached on this host at their configured port.
pub const NEIGHBOR_HOST: std::net::Ipv4Addr = std::net::Ipv4Addr::LOCALHOST;
