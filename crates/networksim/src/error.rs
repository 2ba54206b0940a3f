//! Error types for the ring network domain model.
//!
//! Configuration and argument errors are fatal and surface to the caller as a
//! [`Result`]. Runtime transmission anomalies are not represented here: they
//! are recorded as [`ErrorKind`] entries in the simulator's error ledger and
//! do not abort a run.

use std::fmt;

/// Errors raised while constructing a [`Model`](crate::constants::Model) or a
/// [`Ring`](crate::ring::Ring).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The time unit string was not `"ns"` or `"s"`.
    InvalidTimeUnit(String),
    /// The maximum number of data or control packets on a ring was not a
    /// positive even integer.
    InvalidSlotCount {
        /// Which clock the bad count came from.
        clock: &'static str,
        /// The offending value.
        count: u64,
    },
    /// The requested transmitter/receiver combination is not implemented.
    UnimplementedCombination {
        /// The transmitter kind requested.
        transmitter: &'static str,
        /// The receiver kind requested.
        receiver: &'static str,
    },
    /// The traffic generation method was not `"poisson"` or `"pareto"`.
    UnknownTrafficMethod(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeUnit(unit) => {
                write!(f, "unknown time unit {unit:?}, expected \"ns\" or \"s\"")
            }
            ConfigError::InvalidSlotCount { clock, count } => write!(
                f,
                "{clock} clock would need {count} max packets on ring, which must be a positive even integer"
            ),
            ConfigError::UnimplementedCombination {
                transmitter,
                receiver,
            } => write!(
                f,
                "the {transmitter}-{receiver} combination is not implemented"
            ),
            ConfigError::UnknownTrafficMethod(method) => {
                write!(f, "unknown traffic generation method {method:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised at a call site from bad arguments, as opposed to bad
/// configuration at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgError {
    /// A node id was out of the `[0, num_nodes)` range.
    NodeOutOfRange {
        /// The offending id.
        node_id: usize,
        /// The number of nodes in the model.
        num_nodes: usize,
    },
    /// An info/summary query type string was not recognised.
    UnknownQueryType(String),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgError::NodeOutOfRange { node_id, num_nodes } => write!(
                f,
                "node id {node_id} is out of range for a network of {num_nodes} nodes"
            ),
            ArgError::UnknownQueryType(kind) => write!(f, "unrecognised query type {kind:?}"),
        }
    }
}

impl std::error::Error for ArgError {}

/// The kind of a runtime transmission anomaly, recorded in the error ledger.
///
/// These never abort a run: a MAC state machine that hits one of these logs
/// it with [`log::warn!`] and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A transmitter wanted to send a control packet but found its own
    /// control slot already occupied.
    ControlSlotCollision,
    /// A transmitter wanted to send a data packet but found its own data
    /// slot already occupied.
    DataSlotCollision,
    /// A receiver's control handshake completed but the expected data packet
    /// never showed up on the target ring before the run ended.
    MissingDataAfterControl,
    /// A ring was asked to accept a packet while already at its maximum
    /// occupancy.
    RingCapacityExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::ControlSlotCollision => "control slot collision",
            ErrorKind::DataSlotCollision => "data slot collision",
            ErrorKind::MissingDataAfterControl => "missing data after control reception",
            ErrorKind::RingCapacityExceeded => "ring capacity exceeded",
        };
        write!(f, "{s}")
    }
}
