//! Receiver MAC state machines: fixed (FR) and tunable (TR).
//!
//! Mirrors [`crate::transmitter`]: a `(control_received, data_received)`
//! flag pair enforces that a receiver only looks for a data packet after its
//! control handshake completed, and only looks for the next control packet
//! after the data it announced actually arrived.

use log::{debug, warn};

use crate::constants::Model;
use crate::packet::Packet;
use crate::ring::Ring;
use crate::signal::ControlSignal;

/// Which wavelength-selection policy a receiver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    /// Fixed receiver: always listens on its own home ring.
    Fixed,
    /// Tunable receiver: retunes to the source's ring announced by the most
    /// recent control packet.
    Tunable,
}

/// A data packet a receiver has accepted, kept for Info queries.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedLogEntry {
    /// Time of reception.
    pub timestamp: f64,
    /// The packet received.
    pub packet: Packet,
}

/// The outcome of a successful reception, used by the caller to append a
/// transfer-delay entry to the latency ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceptionRecord {
    /// Source node id.
    pub source: usize,
    /// Destination (this receiver's) node id.
    pub destination: usize,
    /// Time the packet was generated and queued at the source.
    pub generation_time: f64,
    /// Time the packet was injected onto the ring.
    pub transmission_time: f64,
    /// Time the packet was accepted here.
    pub reception_time: f64,
}

/// Per-node receiver state.
#[derive(Debug, Clone)]
pub struct ReceiverState {
    node_id: usize,
    kind: ReceiverKind,
    control_received: bool,
    data_received: bool,
    tuned: bool,
    pending_source: Option<usize>,
    received_log: Vec<ReceivedLogEntry>,
}

impl ReceiverState {
    /// Construct receiver state for `node_id`. `(control_received,
    /// data_received)` starts at `(false, true)`, mirroring the transmitter.
    pub fn new(node_id: usize, kind: ReceiverKind) -> Self {
        ReceiverState {
            node_id,
            kind,
            control_received: false,
            data_received: true,
            tuned: true,
            pending_source: None,
            received_log: Vec::new(),
        }
    }

    /// The `control_received XOR data_received` invariant holds at every
    /// suspension point.
    pub fn flags_consistent(&self) -> bool {
        self.control_received != self.data_received
    }

    /// Log of data packets this receiver has accepted.
    pub fn received_log(&self) -> &[ReceivedLogEntry] {
        &self.received_log
    }

    /// `true` once a control handshake has completed but the matching data
    /// packet has not yet been seen; used by the simulator to detect
    /// stragglers at the end of a run.
    pub fn awaiting_data(&self) -> bool {
        self.control_received
    }

    /// The data ring this receiver is currently listening to: its own home
    /// ring for FR, or the most recently announced source's ring for TR.
    pub fn listen_ring(&self) -> usize {
        match self.kind {
            ReceiverKind::Fixed => self.node_id,
            ReceiverKind::Tunable => self.pending_source.unwrap_or(self.node_id),
        }
    }

    /// Advance the control task: look for a control packet addressed to this
    /// node. If found, decode it, record the announced source, and consume
    /// the control packet (it has reached its destination).
    pub fn step_control(&mut self, control_ring: &mut Ring, codec: &ControlSignal, now: f64) {
        if !self.data_received {
            return;
        }
        let Some(packet) = control_ring.check_addressed_to(now, self.node_id, self.node_id) else {
            return;
        };
        let packet = packet.clone();
        let crate::packet::Payload::Raw(raw) = &packet.payload else {
            warn!("rx {}: control packet with non-raw payload", self.node_id);
            return;
        };
        let Some(triple) = codec.decode(raw) else {
            warn!("rx {}: failed to decode control packet", self.node_id);
            return;
        };
        control_ring.remove(self.node_id, &packet, now);
        debug!(
            "rx {}: received control announcement from {} at t={now}",
            self.node_id, triple.source
        );
        if self.kind == ReceiverKind::Tunable {
            self.tuned = false;
        }
        self.pending_source = Some(triple.source);
        self.control_received = true;
        self.data_received = false;
    }

    /// Advance the data task: if a control announcement is outstanding and
    /// (for TR) the transceiver is tuned, check the listen ring for the
    /// announced data packet and accept it.
    ///
    /// Returns `(record, next_wake_delay)`, analogous to
    /// [`crate::transmitter::TransmitterState::step_data`].
    pub fn step_data(
        &mut self,
        data_ring: &mut Ring,
        model: &Model,
        now: f64,
    ) -> (Option<ReceptionRecord>, f64) {
        if !self.control_received {
            return (None, model.data_clock_cycle());
        }
        if self.kind == ReceiverKind::Tunable && !self.tuned {
            self.tuned = true;
            return (None, model.tuning_time());
        }
        let Some(packet) = data_ring.check_addressed_to(now, self.node_id, self.node_id) else {
            return (None, model.data_clock_cycle());
        };
        let packet = packet.clone();
        let record = ReceptionRecord {
            source: packet.source_node_id,
            destination: self.node_id,
            generation_time: packet.generation_time,
            transmission_time: packet.transmission_time,
            reception_time: now,
        };
        data_ring.remove(self.node_id, &packet, now);
        debug!(
            "rx {}: received data packet from {} at t={now}",
            self.node_id, packet.source_node_id
        );
        self.received_log.push(ReceivedLogEntry {
            timestamp: now,
            packet,
        });
        self.data_received = true;
        self.control_received = false;
        (Some(record), model.data_clock_cycle())
    }
}
