// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

macro_rules! router_log {
    ($self:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_ROUTER,
            "asn" => $self.asn,
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $msg:expr, $($args:expr),*; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_ROUTER,
            "asn" => $self.asn,
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $msg:expr) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_ROUTER,
            "asn" => $self.asn,
        )
    };
    ($self:expr, $level:ident, $msg:expr, $($args:expr),*) => {
        slog::$level!($self.log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_ROUTER,
            "asn" => $self.asn,
        )
    };
}

macro_rules! dispatcher_log {
    ($self:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_DISPATCHER,
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $msg:expr, $($args:expr),*; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_DISPATCHER,
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $msg:expr) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_DISPATCHER,
        )
    };
    ($self:expr, $level:ident, $msg:expr, $($args:expr),*) => {
        slog::$level!($self.log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_ROUTER,
            "unit" => UNIT_DISPATCHER,
        )
    };
}

macro_rules! connection_log {
    ($self:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
            "peer" => $self.peer,
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $msg:expr, $($args:expr),*; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
            "peer" => $self.peer,
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $msg:expr) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
            "peer" => $self.peer,
        )
    };
    ($self:expr, $level:ident, $msg:expr, $($args:expr),*) => {
        slog::$level!($self.log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
            "peer" => $self.peer,
        )
    };
}

// connection_log variant used in functions that are not methods (no "self")
macro_rules! connection_log_lite {
    ($log:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr, $($args:expr),*; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
        )
    };
    ($log:expr, $level:ident, $msg:expr, $($args:expr),*) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_PVR,
            "module" => crate::MOD_NEIGHBOR,
            "unit" => UNIT_CONNECTION,
        )
    };
}

pub(crate) use {
    connection_log, connection_log_lite, dispatcher_log, router_log,
};
