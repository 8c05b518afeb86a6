// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The routing database (rdb).
//!
//! The database holds every route learned from neighbors, keyed by the full
//! route record, together with the neighbor that advertised it. Routes to
//! the same prefix that differ in any attribute are distinct entries, so the
//! table keeps every concurrently valid path and selection happens when
//! traffic is forwarded or the table is dumped. Alongside the RIB the
//! database keeps a per-neighbor record of every withdrawal received. All
//! information is volatile and lives only as long as the process.
use crate::aggregate::aggregate;
use crate::bestpath::bestpath;
use crate::log::rdb_log;
use crate::types::*;
use slog::Logger;
use std::collections::{BTreeMap, BTreeSet};

const UNIT_RIB: &str = "rib";

/// Routes and the neighbor address that advertised each of them.
pub type Rib = BTreeMap<Route, Address>;

/// Withdrawn prefixes indexed by the neighbor that withdrew them.
pub type RevocationLog = BTreeMap<Address, BTreeSet<NetworkDescription>>;

pub struct Db {
    rib: Rib,
    revoked: RevocationLog,
    log: Logger,
}

impl Db {
    pub fn new(log: Logger) -> Self {
        Self {
            rib: Rib::new(),
            revoked: RevocationLog::new(),
            log,
        }
    }

    pub fn rib(&self) -> &Rib {
        &self.rib
    }

    pub fn len(&self) -> usize {
        self.rib.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rib.is_empty()
    }

    /// Add a route learned from `nexthop`. An identical route already in the
    /// table has its next hop replaced, and the previous next hop is
    /// returned.
    pub fn insert(&mut self, route: Route, nexthop: Address) -> Option<Address> {
        let description = route.description();
        let previous = self.rib.insert(route, nexthop);
        rdb_log!(self, debug, "inserted route to {}", description;
            "nexthop" => nexthop
        );
        previous
    }

    pub fn remove(&mut self, route: &Route) -> Option<Address> {
        self.rib.remove(route)
    }

    /// Record the withdrawals sent by `nexthop` and remove every route to a
    /// withdrawn prefix that was learned from it. The removed routes are
    /// returned. Withdrawing a prefix with no matching route is a no-op.
    pub fn withdraw(
        &mut self,
        nexthop: Address,
        withdrawn: &[NetworkDescription],
    ) -> Vec<Route> {
        self.revoked
            .entry(nexthop)
            .or_default()
            .extend(withdrawn.iter().copied());

        let mut removed = Vec::new();
        for description in withdrawn {
            let matching: Vec<Route> = self
                .rib
                .iter()
                .filter(|(route, nh)| {
                    **nh == nexthop && route.description() == *description
                })
                .map(|(route, _)| route.clone())
                .collect();

            if matching.is_empty() {
                rdb_log!(self, info, "no route to withdraw for {}", description;
                    "nexthop" => nexthop
                );
                continue;
            }

            for route in matching {
                self.rib.remove(&route);
                removed.push(route);
            }
        }
        removed
    }

    /// Every prefix `neighbor` has ever withdrawn.
    pub fn revoked(
        &self,
        neighbor: Address,
    ) -> Option<&BTreeSet<NetworkDescription>> {
        self.revoked.get(&neighbor)
    }

    /// Select the route and next hop used to reach `destination`.
    pub fn bestpath(&self, destination: Address) -> Option<(&Route, Address)> {
        bestpath(destination, &self.rib)
    }

    /// An aggregated view of the table. The table itself is not modified.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        aggregate(&self.rib)
    }
}
