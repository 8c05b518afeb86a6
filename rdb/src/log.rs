// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Log from a `Db` method. Records carry the component, the unit named by
/// the calling module's `UNIT_RIB`, and the number of routes in the table
/// at the time of the call.
macro_rules! rdb_log {
    ($self:expr, $level:ident, $($fmt:expr),+; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $($fmt),+;
            "component" => crate::COMPONENT_RDB,
            "unit" => UNIT_RIB,
            "routes" => $self.rib.len(),
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $($fmt:expr),+) => {
        slog::$level!($self.log,
            $($fmt),+;
            "component" => crate::COMPONENT_RDB,
            "unit" => UNIT_RIB,
            "routes" => $self.rib.len()
        )
    };
}

pub(crate) use rdb_log;
