// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::connection::{Inbound, NeighborConnection};
use crate::error::Error;
use crate::log::router_log;
use crate::messages::{Envelope, Message, MessageType, UpdateMessage};
use crate::policy::{check_export, check_forward, CheckerResult};
use rdb::{Address, Db, NetworkDescription, Relationship};
use serde_json::Value;
use slog::Logger;
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

const UNIT_ROUTER: &str = "router";

/// A configured neighbor and the link used to reach it.
pub struct Neighbor<Cnx: NeighborConnection> {
    pub relationship: Relationship,
    pub conn: Cnx,
}

/// The routing state of a single autonomous system and the handlers that
/// act on it. Each handler runs to completion for one message, mutating the
/// database and sending whatever messages the message calls for.
pub struct Router<Cnx: NeighborConnection> {
    pub asn: u32,
    pub db: Db,
    neighbors: BTreeMap<Address, Neighbor<Cnx>>,
    log: Logger,
}

impl<Cnx: NeighborConnection> Router<Cnx> {
    pub fn new(asn: u32, log: Logger) -> Self {
        Self {
            asn,
            db: Db::new(log.clone()),
            neighbors: BTreeMap::new(),
            log,
        }
    }

    pub fn add_neighbor(
        &mut self,
        relationship: Relationship,
        conn: Cnx,
    ) -> Result<(), Error> {
        let address = conn.peer();
        if self.neighbors.contains_key(&address) {
            return Err(Error::NeighborExists(address));
        }
        router_log!(self, info, "adding neighbor {address}";
            "relationship" => relationship.to_string()
        );
        self.neighbors
            .insert(address, Neighbor { relationship, conn });
        Ok(())
    }

    /// The relationship with `neighbor`. Every address a message can arrive
    /// from or be sent to is a configured neighbor, so a miss here is fatal.
    pub fn relationship(&self, neighbor: Address) -> Result<Relationship, Error> {
        self.neighbors
            .get(&neighbor)
            .map(|n| n.relationship)
            .ok_or(Error::UnknownNeighbor(neighbor))
    }

    /// Send a message to `to`. Failing to reach a configured neighbor is
    /// logged and otherwise ignored, there is no retransmission.
    pub fn send(&self, to: Address, msg: Envelope) -> Result<(), Error> {
        let neighbor =
            self.neighbors.get(&to).ok_or(Error::UnknownNeighbor(to))?;
        if let Err(e) = neighbor.conn.send(&msg) {
            router_log!(self, error, "failed to send {} to {to}: {e}", msg.typ();
                "neighbor" => to
            );
        }
        Ok(())
    }

    /// Announce ourselves on every link.
    pub fn handshake(&self) -> Result<(), Error> {
        for address in self.neighbors.keys() {
            let msg = Message::empty(MessageType::Handshake)?;
            self.send(*address, Envelope::new(address.gateway(), *address, msg))?;
        }
        Ok(())
    }

    /// Deliver datagrams arriving on every link to `tx`.
    pub fn start_recv(&self, tx: &Sender<Inbound>) -> Result<(), Error> {
        for neighbor in self.neighbors.values() {
            neighbor.conn.start_recv(tx.clone())?;
        }
        Ok(())
    }

    /// Handle a message received from the neighbor `from`.
    pub fn handle(&mut self, from: Address, env: Envelope) -> Result<(), Error> {
        let typ = env.typ();
        match env.msg {
            Message::Update(update) => self.handle_update(from, update),
            Message::Withdraw(withdrawn) => {
                self.handle_withdraw(from, withdrawn)
            }
            Message::Data(payload) => self.handle_data(from, env.dst, payload),
            Message::Dump => self.handle_dump(from),
            Message::Handshake(_) | Message::NoRoute(_) | Message::Table(_) => {
                router_log!(self, info, "ignoring {typ} message";
                    "neighbor" => from
                );
                Ok(())
            }
        }
    }

    fn handle_update(
        &mut self,
        from: Address,
        update: UpdateMessage,
    ) -> Result<(), Error> {
        let source = self.relationship(from)?;
        let route = update.route();
        router_log!(self, info, "update {route}";
            "neighbor" => from
        );
        self.db.insert(route, from);

        let announcement = update.announcement().prepend(self.asn);
        self.export(from, source, Message::Update(announcement.into()))
    }

    fn handle_withdraw(
        &mut self,
        from: Address,
        withdrawn: Vec<NetworkDescription>,
    ) -> Result<(), Error> {
        let source = self.relationship(from)?;
        let removed = self.db.withdraw(from, &withdrawn);
        router_log!(self, info, "withdraw removed {} routes", removed.len();
            "neighbor" => from
        );
        self.export(from, source, Message::Withdraw(withdrawn))
    }

    /// Propagate routing information learned from `from` to every other
    /// neighbor the export policy allows.
    fn export(
        &self,
        from: Address,
        source: Relationship,
        msg: Message,
    ) -> Result<(), Error> {
        for (address, neighbor) in &self.neighbors {
            if *address == from {
                continue;
            }
            if check_export(source, neighbor.relationship) == CheckerResult::Drop
            {
                router_log!(self, debug, "not exporting {} to {address}", msg.typ();
                    "neighbor" => from,
                    "relationship" => neighbor.relationship.to_string()
                );
                continue;
            }
            self.send(
                *address,
                Envelope::new(address.gateway(), *address, msg.clone()),
            )?;
        }
        Ok(())
    }

    fn handle_data(
        &self,
        from: Address,
        dst: Address,
        payload: Value,
    ) -> Result<(), Error> {
        let source = self.relationship(from)?;

        let Some((route, nexthop)) = self.db.bestpath(dst) else {
            router_log!(self, info, "no route to {dst}, dropping data";
                "neighbor" => from
            );
            return Ok(());
        };

        let outgoing = self.relationship(nexthop)?;
        match check_forward(source, outgoing) {
            CheckerResult::Accept => {
                router_log!(self, debug, "forwarding data for {dst} via {route}";
                    "neighbor" => from,
                    "nexthop" => nexthop
                );
                self.send(
                    nexthop,
                    Envelope::new(nexthop.gateway(), dst, Message::Data(payload)),
                )
            }
            CheckerResult::Drop => {
                router_log!(self, info,
                    "refusing to carry data for {dst} to {outgoing} {nexthop}";
                    "neighbor" => from,
                    "relationship" => source.to_string()
                );
                let reply = Message::empty(MessageType::NoRoute)?;
                self.send(from, Envelope::new(from.gateway(), from, reply))
            }
        }
    }

    fn handle_dump(&self, from: Address) -> Result<(), Error> {
        let table = self.db.snapshot();
        router_log!(self, info, "sending table of {} entries", table.len();
            "neighbor" => from
        );
        self.send(
            from,
            Envelope::new(from.gateway(), from, Message::Table(table)),
        )
    }
}
