// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::NeighborConfig;
use crate::error::Error;
use crate::messages::Envelope;
use rdb::Address;
use slog::Logger;
use std::sync::mpsc::Sender;

/// A datagram read from a neighbor link, not yet decoded.
#[derive(Debug, Clone)]
pub struct Inbound {
    /// The neighbor whose link the datagram arrived on.
    pub peer: Address,
    pub buf: Vec<u8>,
}

/// A link to a single neighbor.
pub trait NeighborConnection: Send {
    /// Open the link to the neighbor described by `config`.
    fn new(config: &NeighborConfig, log: Logger) -> Result<Self, Error>
    where
        Self: Sized;

    /// Deliver every datagram that arrives on this link to `tx`, tagged with
    /// the neighbor address. Delivery happens in the background until the
    /// connection is dropped or `tx` hangs up.
    fn start_recv(&self, tx: Sender<Inbound>) -> Result<(), Error>;

    fn send(&self, msg: &Envelope) -> Result<(), Error>;

    fn peer(&self) -> Address;
}
