//! Domain types and MAC state machines for a synchronous optical ring
//! network: nodes connected by a control ring and one or more per-wavelength
//! data rings, with fixed/tunable transmitters and receivers exchanging
//! packets under a strict control-before-data handshake.
//!
//! This crate models the network's physics and protocol state machines. It
//! has no notion of wall-clock time or event ordering across nodes; that is
//! the job of the scheduler and simulator façade in the companion
//! `networksim-sim` crate, which drives these types forward in virtual time.

pub mod constants;
pub mod dist;
pub mod error;
pub mod packet;
pub mod ram;
pub mod receiver;
pub mod ring;
pub mod signal;
pub mod transmitter;

pub use constants::{Constants, Model, TimeUnit};
pub use dist::{Distribution, TrafficMethod};
pub use error::{ArgError, ConfigError, ErrorKind};
pub use packet::{Packet, Payload, RingLogEntry};
pub use ram::Ram;
pub use receiver::{ReceiverKind, ReceiverState, ReceptionRecord};
pub use ring::Ring;
pub use signal::{ControlSignal, ControlTriple};
pub use transmitter::{DataStepOutcome, TransmissionRecord, TransmitterKind, TransmitterState};

/// Validate that a transmitter/receiver combination is one of the two the
/// network supports: fixed transmitter with tunable receiver (FT/TR), or
/// tunable transmitter with fixed receiver (TT/FR). The reverse pairings
/// (FT/FR, TT/TR) are rejected.
pub fn validate_mac_combination(
    transmitter: TransmitterKind,
    receiver: ReceiverKind,
) -> Result<(), error::ConfigError> {
    use ReceiverKind::{Fixed as RFixed, Tunable as RTunable};
    use TransmitterKind::{Fixed as TFixed, Tunable as TTunable};
    match (transmitter, receiver) {
        (TFixed, RTunable) | (TTunable, RFixed) => Ok(()),
        (TFixed, RFixed) => Err(error::ConfigError::UnimplementedCombination {
            transmitter: "fixed",
            receiver: "fixed",
        }),
        (TTunable, RTunable) => Err(error::ConfigError::UnimplementedCombination {
            transmitter: "tunable",
            receiver: "tunable",
        }),
    }
}
