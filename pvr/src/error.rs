// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rdb::Address;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown message type {0}")]
    UnknownMessageType(String),

    #[error("unknown neighbor {0}")]
    UnknownNeighbor(Address),

    #[error("neighbor {0} already exists")]
    NeighborExists(Address),

    #[error("invalid neighbor {0}")]
    InvalidNeighbor(String),

    #[error("timeout")]
    Timeout,

    #[error("disconnected")]
    Disconnected,

    #[error("channel send: {0}")]
    ChannelSend(String),
}
