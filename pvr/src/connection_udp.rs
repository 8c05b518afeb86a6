// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::NeighborConfig;
use crate::connection::{Inbound, NeighborConnection};
use crate::error::Error;
use crate::log::{connection_log, connection_log_lite};
use crate::messages::{Envelope, MAX_MESSAGE_SIZE};
use crate::{IO_TIMEOUT, NEIGHBOR_HOST};
use rdb::Address;
use slog::Logger;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{sleep, spawn};
use std::time::Duration;

const UNIT_CONNECTION: &str = "connection_udp";

/// A neighbor link over a UDP socket. The socket is bound to an ephemeral
/// local port and sends to the neighbor's port on the local host.
pub struct NeighborConnectionUdp {
    peer: Address,
    target: SocketAddr,
    socket: Arc<UdpSocket>,
    shutdown: Arc<AtomicBool>,
    log: Logger,
}

impl NeighborConnection for NeighborConnectionUdp {
    fn new(config: &NeighborConfig, log: Logger) -> Result<Self, Error> {
        let s = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        let local = SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0);
        s.bind(&local.into())?;
        s.set_read_timeout(Some(IO_TIMEOUT))?;

        let socket: UdpSocket = s.into();
        let local = socket.local_addr()?;
        let target = SocketAddrV4::new(NEIGHBOR_HOST, config.port).into();

        let conn = Self {
            peer: config.address,
            target,
            socket: Arc::new(socket),
            shutdown: Arc::new(AtomicBool::new(false)),
            log,
        };
        connection_log!(conn, debug, "link open";
            "local" => format!("{local}"),
            "target" => format!("{}", conn.target)
        );
        Ok(conn)
    }

    fn start_recv(&self, tx: Sender<Inbound>) -> Result<(), Error> {
        let peer = self.peer;
        let socket = self.socket.clone();
        let shutdown = self.shutdown.clone();
        let log = self.log.clone();

        spawn(move || {
            let mut buf = vec![0u8; MAX_MESSAGE_SIZE];
            loop {
                if shutdown.load(Ordering::Relaxed) {
                    connection_log_lite!(log, debug, "receiver shutting down";
                        "peer" => peer
                    );
                    break;
                }

                let n = match socket.recv_from(&mut buf) {
                    Ok((n, _)) => n,
                    Err(e) => {
                        let wait = recv_backoff(&e);
                        if !wait.is_zero() {
                            connection_log_lite!(log, error, "recv: {e}";
                                "peer" => peer
                            );
                            sleep(wait);
                        }
                        continue;
                    }
                };

                let inbound = Inbound {
                    peer,
                    buf: buf[..n].to_vec(),
                };
                if tx.send(inbound).is_err() {
                    connection_log_lite!(log, debug,
                        "dispatcher hung up, stopping receiver";
                        "peer" => peer
                    );
                    break;
                }
            }
        });

        Ok(())
    }

    fn send(&self, msg: &Envelope) -> Result<(), Error> {
        let buf = msg.to_wire()?;
        self.socket.send_to(&buf, self.target)?;
        connection_log!(self, trace, "sent {}", msg.typ();
            "dst" => msg.dst
        );
        Ok(())
    }

    fn peer(&self) -> Address {
        self.peer
    }
}

/// How long the receiver waits before reading again after `e`. Read
/// timeouts and interruptions are retried immediately, anything else is
/// given a read interval to clear so a persistent error cannot spin.
fn recv_backoff(e: &std::io::Error) -> Duration {
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            Duration::ZERO
        }
        _ => IO_TIMEOUT,
    }
}

impl Drop for NeighborConnectionUdp {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_recv_backoff() {
        for kind in [
            ErrorKind::WouldBlock,
            ErrorKind::TimedOut,
            ErrorKind::Interrupted,
        ] {
            assert_eq!(recv_backoff(&io::Error::from(kind)), Duration::ZERO);
        }
        for kind in [ErrorKind::ConnectionRefused, ErrorKind::Other] {
            assert_eq!(recv_backoff(&io::Error::from(kind)), IO_TIMEOUT);
        }
    }
}
