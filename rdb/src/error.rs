// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::net::Ipv4Addr;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid address {0}")]
    InvalidAddress(String),

    #[error("non-contiguous subnet mask {0}")]
    InvalidMask(Ipv4Addr),

    #[error("invalid origin {0}")]
    InvalidOrigin(String),

    #[error("invalid relationship {0}")]
    InvalidRelationship(String),
}
