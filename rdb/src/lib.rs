// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod aggregate;
pub mod bestpath;
pub mod db;
pub mod error;
pub mod log;
pub mod types;

pub use db::Db;
pub use types::*;

#[cfg(test)]
mod proptest;

/// The local preference assigned to routes whose announcement does not
/// carry one.
pub const DEFAULT_LOCAL_PREF: u32 = 100;

pub const COMPONENT_RDB: &str = "rdb";
