// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relationship based policy. A router only carries traffic, and only
//! advertises routes, when someone pays for it.
//!
//! - Announcements and withdrawals received from a customer are propagated to
//!   every other neighbor. Those received from a peer or a provider are only
//!   propagated to customers.
//! - Data received from a customer may go to any next hop. Data received from
//!   a peer or a provider may only go to a customer, since handing it to
//!   another peer or provider would carry traffic nobody pays for.

use rdb::Relationship;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CheckerResult {
    Accept,
    Drop,
}

/// Check whether routing information learned from a neighbor with
/// relationship `from` is propagated to a neighbor with relationship `to`.
pub fn check_export(from: Relationship, to: Relationship) -> CheckerResult {
    match (from, to) {
        (Relationship::Customer, _) => CheckerResult::Accept,
        (_, Relationship::Customer) => CheckerResult::Accept,
        _ => CheckerResult::Drop,
    }
}

/// Check whether data received from a neighbor with relationship `from` may
/// be forwarded to a next hop with relationship `to`.
pub fn check_forward(from: Relationship, to: Relationship) -> CheckerResult {
    match (from, to) {
        (Relationship::Peer | Relationship::Provider, Relationship::Peer) => {
            CheckerResult::Drop
        }
        (
            Relationship::Peer | Relationship::Provider,
            Relationship::Provider,
        ) => CheckerResult::Drop,
        _ => CheckerResult::Accept,
    }
}
