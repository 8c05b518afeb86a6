// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::RouterConfig;
use crate::connection::{Inbound, NeighborConnection};
use crate::error::Error;
use crate::log::dispatcher_log;
use crate::messages::Envelope;
use crate::router::Router;
use crate::IO_TIMEOUT;
use slog::Logger;
use std::iter::once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::Arc;

const UNIT_DISPATCHER: &str = "dispatcher";

/// A handle for stopping a running dispatcher from another thread.
#[derive(Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The dispatcher owns a router and every neighbor link. Constructing it is
/// the startup phase: links are opened, handshakes sent, and receivers
/// started. `run` is the active phase, which waits for datagrams from any
/// neighbor and hands each one, decoded, to the router.
pub struct Dispatcher<Cnx: NeighborConnection> {
    router: Router<Cnx>,
    inbound: Receiver<Inbound>,
    shutdown: Shutdown,
    log: Logger,
}

impl<Cnx: NeighborConnection> Dispatcher<Cnx> {
    pub fn new(config: &RouterConfig, log: Logger) -> Result<Self, Error> {
        let (tx, rx) = channel();
        let mut router = Router::new(config.asn, log.clone());

        for neighbor in &config.neighbors {
            let conn = Cnx::new(neighbor, log.clone())?;
            router.add_neighbor(neighbor.relationship, conn)?;
        }
        router.handshake()?;
        router.start_recv(&tx)?;

        let dispatcher = Self {
            router,
            inbound: rx,
            shutdown: Shutdown::default(),
            log,
        };
        dispatcher_log!(dispatcher, info, "router started";
            "asn" => config.asn,
            "neighbors" => config.neighbors.len()
        );
        Ok(dispatcher)
    }

    pub fn router(&self) -> &Router<Cnx> {
        &self.router
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Process messages until shut down, or until the router hits an error
    /// it cannot recover from.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            if self.shutdown.requested() {
                dispatcher_log!(self, info, "shutting down");
                return Ok(());
            }

            let first = match self.inbound.recv_timeout(IO_TIMEOUT) {
                Ok(inbound) => inbound,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Error::Disconnected)
                }
            };

            // Handle everything that is ready before waiting again.
            let ready: Vec<Inbound> =
                once(first).chain(self.inbound.try_iter()).collect();
            for inbound in ready {
                self.dispatch(inbound)?;
            }
        }
    }

    fn dispatch(&mut self, inbound: Inbound) -> Result<(), Error> {
        let env = match Envelope::from_wire(&inbound.buf) {
            Ok(env) => env,
            Err(Error::UnknownMessageType(typ)) => {
                dispatcher_log!(self, info, "ignoring unknown message type {typ}";
                    "neighbor" => inbound.peer
                );
                return Ok(());
            }
            Err(e) => {
                dispatcher_log!(self, warn, "dropping undecodable message: {e}";
                    "neighbor" => inbound.peer,
                    "message" => String::from_utf8_lossy(&inbound.buf).into_owned()
                );
                return Ok(());
            }
        };

        dispatcher_log!(self, info, "received {}", env.typ();
            "neighbor" => inbound.peer,
            "src" => env.src,
            "dst" => env.dst
        );
        self.router.handle(inbound.peer, env)
    }
}
