// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// This file contains code for testing purposes only. Note that it's only
/// included in `lib.rs` with a `#[cfg(test)]` guard. The purpose of the
/// code in this file is to implement NeighborConnection over a simulated
/// network so the router and dispatcher can be exercised without sockets.
/// Every link registers its far end with the network under the neighbor's
/// port, and tests pick up that far end to play the part of the neighbor.
use crate::{
    config::NeighborConfig,
    connection::{Inbound, NeighborConnection},
    error::Error,
    log::{connection_log, connection_log_lite},
    messages::Envelope,
};
use pvr_common::lock;
use rdb::Address;
use slog::Logger;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU16, Ordering},
        mpsc::{channel, Receiver, RecvTimeoutError, Sender},
        Mutex,
    },
    thread::{sleep, spawn},
    time::Duration,
};

const UNIT_CONNECTION: &str = "connection_channel";

/// How long a test waits for the router to do something.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Ports handed out to tests, so concurrently running tests never share an
/// endpoint on the global network.
static NEXT_PORT: AtomicU16 = AtomicU16::new(10000);

pub fn next_port() -> u16 {
    NEXT_PORT.fetch_add(1, Ordering::Relaxed)
}

lazy_static! {
    static ref NET: Network = Network::new();
}

/// A simulated network mapping neighbor ports to the far end of the link
/// the router opened to that port.
pub struct Network {
    endpoints: Mutex<HashMap<u16, Remote>>,
}

impl Network {
    fn new() -> Self {
        Self {
            endpoints: Mutex::new(HashMap::new()),
        }
    }

    fn attach(&self, port: u16, remote: Remote) {
        lock!(self.endpoints).insert(port, remote);
    }

    fn detach(&self, port: u16) -> Option<Remote> {
        lock!(self.endpoints).remove(&port)
    }
}

/// The neighbor's side of a simulated link.
pub struct Remote {
    /// Messages the router sent to the neighbor.
    rx: Receiver<Envelope>,
    /// Datagrams the neighbor sends to the router.
    tx: Sender<Vec<u8>>,
}

impl Remote {
    /// Take the far end of the link opened to `port`, waiting for the router
    /// to open it if it has not yet.
    pub fn take(port: u16) -> Self {
        let mut waited = Duration::ZERO;
        loop {
            if let Some(remote) = NET.detach(port) {
                return remote;
            }
            if waited >= TEST_TIMEOUT {
                panic!("no link opened to port {port}");
            }
            sleep(Duration::from_millis(10));
            waited += Duration::from_millis(10);
        }
    }

    /// Send a message to the router.
    pub fn send(&self, msg: &Envelope) {
        self.send_raw(msg.to_wire().expect("encode message"));
    }

    /// Send arbitrary bytes to the router.
    pub fn send_raw(&self, buf: Vec<u8>) {
        self.tx.send(buf).expect("send to router");
    }

    /// Wait for the next message from the router.
    pub fn recv(&self) -> Result<Envelope, Error> {
        self.rx.recv_timeout(TEST_TIMEOUT).map_err(|e| match e {
            RecvTimeoutError::Timeout => Error::Timeout,
            RecvTimeoutError::Disconnected => Error::Disconnected,
        })
    }

    /// Every message the router has sent so far that has not been received.
    pub fn drain(&self) -> Vec<Envelope> {
        self.rx.try_iter().collect()
    }
}

pub struct NeighborConnectionChannel {
    peer: Address,
    tx: Sender<Envelope>,
    rx: Mutex<Option<Receiver<Vec<u8>>>>,
    log: Logger,
}

impl NeighborConnection for NeighborConnectionChannel {
    fn new(config: &NeighborConfig, log: Logger) -> Result<Self, Error> {
        let (tx, remote_rx) = channel();
        let (remote_tx, rx) = channel();
        NET.attach(
            config.port,
            Remote {
                rx: remote_rx,
                tx: remote_tx,
            },
        );
        let conn = Self {
            peer: config.address,
            tx,
            rx: Mutex::new(Some(rx)),
            log,
        };
        connection_log!(conn, debug, "link open";
            "port" => config.port
        );
        Ok(conn)
    }

    fn start_recv(&self, tx: Sender<Inbound>) -> Result<(), Error> {
        let rx = lock!(self.rx).take().ok_or(Error::Disconnected)?;
        let peer = self.peer;
        let log = self.log.clone();
        spawn(move || {
            while let Ok(buf) = rx.recv() {
                if tx.send(Inbound { peer, buf }).is_err() {
                    break;
                }
            }
            connection_log_lite!(log, debug, "receiver done";
                "peer" => peer
            );
        });
        Ok(())
    }

    /// Messages are put through the wire encoding in both directions, so
    /// the far end sees exactly what a real neighbor would.
    fn send(&self, msg: &Envelope) -> Result<(), Error> {
        let msg = Envelope::from_wire(&msg.to_wire()?)?;
        self.tx
            .send(msg)
            .map_err(|e| Error::ChannelSend(e.to_string()))
    }

    fn peer(&self) -> Address {
        self.peer
    }
}
