// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Messages exchanged between routers.
//!
//! Every message is a single JSON object carried in one datagram.
//!
//! ```text
//! {
//!   "src":  "<dotted quad>",
//!   "dst":  "<dotted quad>",
//!   "type": "update" | "withdraw" | "data" | "no route"
//!           | "dump" | "table" | "handshake",
//!   "msg":  <payload, shape depends on type>
//! }
//! ```
//!
//! The payload of each type is decoded by its own decoder, selected from the
//! `type` field before the payload is looked at.

use crate::error::Error;
use rdb::{
    Address, Mask, NetworkDescription, Origin, Route, RouteAnnouncement,
    SnapshotEntry, DEFAULT_LOCAL_PREF,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The largest datagram a router will read.
pub const MAX_MESSAGE_SIZE: usize = 65535;

/// The kind of a message, as carried in the `type` field.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "withdraw")]
    Withdraw,
    #[serde(rename = "data")]
    Data,
    #[serde(rename = "no route")]
    NoRoute,
    #[serde(rename = "dump")]
    Dump,
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "handshake")]
    Handshake,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Withdraw => "withdraw",
            Self::Data => "data",
            Self::NoRoute => "no route",
            Self::Dump => "dump",
            Self::Table => "table",
            Self::Handshake => "handshake",
        }
    }

    fn decoder(self) -> PayloadDecoder {
        match self {
            Self::Update => decode_update,
            Self::Withdraw => decode_withdraw,
            Self::Data => decode_data,
            Self::NoRoute => decode_no_route,
            Self::Dump => decode_dump,
            Self::Table => decode_table,
            Self::Handshake => decode_handshake,
        }
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(Self::Update),
            "withdraw" => Ok(Self::Withdraw),
            "data" => Ok(Self::Data),
            "no route" => Ok(Self::NoRoute),
            "dump" => Ok(Self::Dump),
            "table" => Ok(Self::Table),
            "handshake" => Ok(Self::Handshake),
            _ => Err(Error::UnknownMessageType(s.to_string())),
        }
    }
}

/// A route announcement as it travels between routers. Announcements that
/// originate at a neighbor carry their path attributes. Announcements a
/// router propagates carry only the prefix and the extended AS path, and
/// the receiver fills in defaults for the rest.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessage {
    pub network: Address,
    pub netmask: Mask,

    #[serde(rename = "ASPath")]
    pub as_path: Vec<u32>,

    #[serde(
        rename = "localpref",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub local_pref: Option<u32>,

    #[serde(
        rename = "selfOrigin",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub self_originated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl UpdateMessage {
    /// The route this announcement installs, with absent attributes set to
    /// their defaults.
    pub fn route(&self) -> Route {
        Route {
            network: self.network,
            netmask: self.netmask,
            as_path: self.as_path.clone(),
            local_pref: self.local_pref.unwrap_or(DEFAULT_LOCAL_PREF),
            self_originated: self.self_originated.unwrap_or(false),
            origin: self.origin.unwrap_or(Origin::Unknown),
        }
    }

    pub fn announcement(&self) -> RouteAnnouncement {
        RouteAnnouncement {
            network: self.network,
            netmask: self.netmask,
            as_path: self.as_path.clone(),
        }
    }
}

impl From<RouteAnnouncement> for UpdateMessage {
    fn from(value: RouteAnnouncement) -> Self {
        Self {
            network: value.network,
            netmask: value.netmask,
            as_path: value.as_path,
            local_pref: None,
            self_originated: None,
            origin: None,
        }
    }
}

impl From<Route> for UpdateMessage {
    fn from(value: Route) -> Self {
        Self {
            network: value.network,
            netmask: value.netmask,
            as_path: value.as_path,
            local_pref: Some(value.local_pref),
            self_originated: Some(value.self_originated),
            origin: Some(value.origin),
        }
    }
}

/// A decoded message payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Update(UpdateMessage),
    Withdraw(Vec<NetworkDescription>),
    /// User traffic. The payload is opaque and forwarded unchanged.
    Data(Value),
    NoRoute(Value),
    Dump,
    Table(Vec<SnapshotEntry>),
    Handshake(Value),
}

impl Message {
    pub fn typ(&self) -> MessageType {
        match self {
            Self::Update(_) => MessageType::Update,
            Self::Withdraw(_) => MessageType::Withdraw,
            Self::Data(_) => MessageType::Data,
            Self::NoRoute(_) => MessageType::NoRoute,
            Self::Dump => MessageType::Dump,
            Self::Table(_) => MessageType::Table,
            Self::Handshake(_) => MessageType::Handshake,
        }
    }

    /// A message with an empty object payload, as used for handshakes and
    /// no route replies.
    pub fn empty(typ: MessageType) -> Result<Self, Error> {
        typ.decoder()(Value::Object(Default::default()))
    }

    fn payload(&self) -> Result<Value, Error> {
        Ok(match self {
            Self::Update(m) => serde_json::to_value(m)?,
            Self::Withdraw(w) => serde_json::to_value(w)?,
            Self::Data(v) | Self::NoRoute(v) | Self::Handshake(v) => v.clone(),
            Self::Dump => Value::Object(Default::default()),
            Self::Table(t) => serde_json::to_value(t)?,
        })
    }
}

type PayloadDecoder = fn(Value) -> Result<Message, Error>;

fn decode_update(v: Value) -> Result<Message, Error> {
    Ok(Message::Update(serde_json::from_value(v)?))
}

fn decode_withdraw(v: Value) -> Result<Message, Error> {
    Ok(Message::Withdraw(serde_json::from_value(v)?))
}

fn decode_data(v: Value) -> Result<Message, Error> {
    Ok(Message::Data(v))
}

fn decode_no_route(v: Value) -> Result<Message, Error> {
    Ok(Message::NoRoute(v))
}

fn decode_dump(_: Value) -> Result<Message, Error> {
    Ok(Message::Dump)
}

fn decode_table(v: Value) -> Result<Message, Error> {
    Ok(Message::Table(serde_json::from_value(v)?))
}

fn decode_handshake(v: Value) -> Result<Message, Error> {
    Ok(Message::Handshake(v))
}

/// A message together with its addressing.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub src: Address,
    pub dst: Address,
    pub msg: Message,
}

/// The envelope as it appears on the wire, before the payload is decoded.
#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    src: Address,
    dst: Address,
    #[serde(rename = "type")]
    typ: String,
    #[serde(default)]
    msg: Value,
}

impl Envelope {
    pub fn new(src: Address, dst: Address, msg: Message) -> Self {
        Self { src, dst, msg }
    }

    pub fn typ(&self) -> MessageType {
        self.msg.typ()
    }

    pub fn to_wire(&self) -> Result<Vec<u8>, Error> {
        let wire = WireEnvelope {
            src: self.src,
            dst: self.dst,
            typ: self.typ().as_str().to_string(),
            msg: self.msg.payload()?,
        };
        Ok(serde_json::to_vec(&wire)?)
    }

    pub fn from_wire(buf: &[u8]) -> Result<Self, Error> {
        let wire: WireEnvelope = serde_json::from_slice(buf)?;
        let typ: MessageType = wire.typ.parse()?;
        let msg = typ.decoder()(wire.msg)?;
        Ok(Self {
            src: wire.src,
            dst: wire.dst,
            msg,
        })
    }
}
