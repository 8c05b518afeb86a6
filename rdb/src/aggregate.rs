// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Route aggregation for table dumps.
//!
//! Routes learned through the same neighbor are merged when they carry
//! identical attributes and cover the two halves of the same parent block.
//! For example 192.168.0.0/24 and 192.168.1.0/24 merge into 192.168.0.0/23,
//! which in turn merges with 192.168.2.0/23 into 192.168.0.0/22.

use crate::db::Rib;
use crate::types::{prefix_bits, Mask, Route, SnapshotEntry};
use itertools::Itertools;
use std::collections::{BTreeSet, VecDeque};

/// Produce the aggregated form of `rib`, grouped by next hop. Groups are
/// emitted in next hop order and entries within a group in route order.
pub fn aggregate(rib: &Rib) -> Vec<SnapshotEntry> {
    rib.iter()
        .map(|(route, nexthop)| (*nexthop, route.clone()))
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(nexthop, _)| *nexthop)
        .flat_map(|(peer, group)| {
            aggregate_group(group)
                .into_iter()
                .map(move |route| SnapshotEntry { route, peer })
        })
        .collect()
}

/// Aggregate a group of routes that share a next hop.
///
/// This is a worklist algorithm. The route at the head of the list absorbs
/// every route it can merge with, including ones that only become mergeable
/// after an earlier merge, and goes to the back of the list. The work is
/// done once a full pass over the list produces no merge.
pub fn aggregate_group(group: Vec<Route>) -> Vec<Route> {
    let mut pending: VecDeque<Route> = group.into_iter().sorted().collect();
    let mut unchanged = 0;

    while unchanged < pending.len() {
        let Some(mut head) = pending.pop_front() else {
            break;
        };

        let mut merged = false;
        while let Some(i) = pending.iter().position(|r| mergeable(&head, r)) {
            let Some(parent) = merge(&head, &pending[i]) else {
                break;
            };
            pending.remove(i);
            head = parent;
            merged = true;
        }

        pending.push_back(head);
        unchanged = if merged { 0 } else { unchanged + 1 };
    }

    // Folding can reproduce a route already in the group.
    pending
        .into_iter()
        .collect::<BTreeSet<Route>>()
        .into_iter()
        .collect()
}

/// Two routes merge when they differ only in their network and both
/// networks sit in the same block one bit shorter than their mask.
pub fn mergeable(a: &Route, b: &Route) -> bool {
    if a.netmask != b.netmask || a.netmask.length() == 0 {
        return false;
    }
    if a.network == b.network {
        return false;
    }
    if a.as_path != b.as_path
        || a.local_pref != b.local_pref
        || a.self_originated != b.self_originated
        || a.origin != b.origin
    {
        return false;
    }

    let shift = u32::from(a.netmask.shift()) + 1;
    prefix_bits(a.network.to_bits(), shift)
        == prefix_bits(b.network.to_bits(), shift)
}

/// Merge two mergeable routes into the route for their parent block. The
/// result takes the lower network, and the remaining attributes, from the
/// smaller of the two routes. A default route has no parent block.
fn merge(a: &Route, b: &Route) -> Option<Route> {
    let smallest = if a <= b { a } else { b };
    let length = smallest.netmask.length().checked_sub(1)?;
    Some(Route {
        netmask: Mask::from_length(length),
        ..smallest.clone()
    })
}
