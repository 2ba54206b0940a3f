//! Transmitter MAC state machines: fixed (FT) and tunable (TT).
//!
//! Each transmitter couples a control task and a data task through the
//! two-phase `(control_done, data_done)` flag pair. Both tasks are
//! modeled as `step` functions rather than coroutines: the scheduler
//! calls them at their respective clock ticks and they mutate
//! [`TransmitterState`] plus the rings they are authorised to append to.

use log::{debug, trace, warn};

use crate::constants::Model;
use crate::error::ErrorKind;
use crate::packet::Packet;
use crate::ram::Ram;
use crate::ring::Ring;
use crate::signal::{ControlSignal, ControlTriple, CODE_NEW_DATA};

/// Which wavelength-selection policy a transmitter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitterKind {
    /// Fixed transmitter: always injects data on its own wavelength/ring.
    Fixed,
    /// Tunable transmitter: injects data on the destination's wavelength,
    /// paying a retuning cost when the destination changes.
    Tunable,
}

/// A packet a transmitter has sent, kept for Info queries.
#[derive(Debug, Clone, PartialEq)]
pub struct SentLogEntry {
    /// Time of transmission.
    pub timestamp: f64,
    /// The packet sent.
    pub packet: Packet,
}

/// The outcome of one data-task tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataStepOutcome {
    /// Nothing was transmitted this tick (not ready, tuning, or nothing
    /// queued).
    Idle,
    /// A packet was transmitted; the caller should append a queueing-delay
    /// entry to the latency ledger.
    Transmitted(TransmissionRecord),
    /// The own data slot already held an unremoved packet.
    Collision,
    /// The target ring was at capacity when a packet was ready to send.
    CapacityExceeded,
}

/// The outcome of a successful data-packet transmission, used by the caller
/// to append a queueing-delay entry to the latency ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionRecord {
    /// Source node id.
    pub source: usize,
    /// Destination node id.
    pub destination: usize,
    /// Time the packet was generated (queued).
    pub generation_time: f64,
    /// Time the packet was injected onto the ring.
    pub transmission_time: f64,
}

/// Per-node transmitter state: the two-phase handshake flags, tunable
/// retuning bookkeeping, and send logs.
#[derive(Debug, Clone)]
pub struct TransmitterState {
    node_id: usize,
    kind: TransmitterKind,
    control_done: bool,
    data_done: bool,
    tuned: bool,
    current_target: Option<usize>,
    /// `tuning_delay[i][j]`: number of data-clock slots to retune from ring
    /// `i` to ring `j`. `None` for fixed transmitters.
    tuning_delay_table: Option<Vec<Vec<u64>>>,
    /// Slots still owed on the pending retune, looked up from
    /// `tuning_delay_table` the moment the control task picks a new target.
    /// Only meaningful while `tuned` is `false`.
    pending_retune_slots: u64,
    control_log: Vec<SentLogEntry>,
    data_log: Vec<SentLogEntry>,
}

impl TransmitterState {
    /// Construct transmitter state for `node_id`. `(control_done, data_done)`
    /// starts at `(false, true)`: idle, ready to send control first.
    pub fn new(model: &Model, node_id: usize, kind: TransmitterKind) -> Self {
        let tuning_delay_table = match kind {
            TransmitterKind::Fixed => None,
            TransmitterKind::Tunable => {
                let n = model.constants().num_nodes;
                let slots = model.tuning_delay_slots();
                Some(
                    (0..n)
                        .map(|i| (0..n).map(|j| if i == j { 0 } else { slots }).collect())
                        .collect(),
                )
            }
        };
        TransmitterState {
            node_id,
            kind,
            control_done: false,
            data_done: true,
            tuned: true,
            current_target: None,
            tuning_delay_table,
            pending_retune_slots: 0,
            control_log: Vec::new(),
            data_log: Vec::new(),
        }
    }

    /// The `control_done XOR data_done` invariant holds at every suspension
    /// point.
    pub fn flags_consistent(&self) -> bool {
        self.control_done != self.data_done
    }

    /// Log of control packets this transmitter has sent.
    pub fn control_log(&self) -> &[SentLogEntry] {
        &self.control_log
    }

    /// Log of data packets this transmitter has sent.
    pub fn data_log(&self) -> &[SentLogEntry] {
        &self.data_log
    }

    /// The data ring a packet bound for `destination` should use: the
    /// transmitter's own ring for FT, or `destination`'s ring for TT.
    pub fn target_ring_for(&self, destination: usize) -> usize {
        match self.kind {
            TransmitterKind::Fixed => self.node_id,
            TransmitterKind::Tunable => destination,
        }
    }

    /// The data ring the data task should act on right now: the
    /// transmitter's own ring for FT, or the destination announced by the
    /// most recently sent control packet for TT.
    pub fn data_target_ring(&self) -> usize {
        match self.kind {
            TransmitterKind::Fixed => self.node_id,
            TransmitterKind::Tunable => self.current_target.unwrap_or(self.node_id),
        }
    }

    /// Advance the control task: if the RAM has a packet queued, no data
    /// transmission is outstanding, the destination data ring is not
    /// saturated, and the control ring slot at this node is free, inject a
    /// "new data" control packet.
    pub fn step_control(
        &mut self,
        ram: &Ram,
        control_ring: &mut Ring,
        target_data_ring: &Ring,
        model: &Model,
        codec: &ControlSignal,
        now: f64,
    ) -> Option<ErrorKind> {
        if ram.queue_len() == 0 || !self.data_done {
            return None;
        }
        let queued = ram.peek().expect("queue_len() > 0 implies peek() is Some");
        if target_data_ring.live_count() >= model.max_data_packets() as usize {
            trace!(
                "tx {}: data ring {} full, holding control packet",
                self.node_id,
                target_data_ring.id()
            );
            return None;
        }
        if control_ring.check(now, self.node_id).is_some() {
            warn!(
                "tx {}: control slot collision at t={now}",
                self.node_id
            );
            return Some(ErrorKind::ControlSlotCollision);
        }
        let triple = ControlTriple {
            source: self.node_id,
            destination: queued.destination,
            control_code: CODE_NEW_DATA,
        };
        let raw = codec.encode(triple);
        let packet = Packet::new(
            crate::packet::Payload::Raw(raw),
            queued.generation_time,
            now,
            0.0,
            self.node_id,
            queued.destination,
        );
        if control_ring.add(self.node_id, packet.clone()).is_ok() {
            debug!(
                "tx {}: sent control packet -> {} at t={now}",
                self.node_id, queued.destination
            );
            self.control_log.push(SentLogEntry {
                timestamp: now,
                packet,
            });
            self.control_done = true;
            self.data_done = false;
            if self.kind == TransmitterKind::Tunable {
                let table = self
                    .tuning_delay_table
                    .as_ref()
                    .expect("tunable transmitters always build a tuning_delay_table");
                self.pending_retune_slots = match self.current_target {
                    Some(previous) => table[previous][queued.destination],
                    None => table[self.node_id][queued.destination].max(1),
                };
                self.tuned = self.pending_retune_slots == 0;
                self.current_target = Some(queued.destination);
            }
        }
        None
    }

    /// Advance the data task: if a control packet has been sent and (for TT)
    /// the transceiver is tuned, dequeue the RAM head and inject it on the
    /// chosen data ring.
    ///
    /// Returns `(outcome, next_wake_delay)`; `next_wake_delay` is the delay
    /// the caller should schedule the next data-task wake at (one data slot,
    /// or the tuning time if a TT still needs to retune).
    pub fn step_data(
        &mut self,
        ram: &mut Ram,
        data_ring: &mut Ring,
        model: &Model,
        now: f64,
    ) -> (DataStepOutcome, f64) {
        if !self.control_done {
            return (DataStepOutcome::Idle, model.data_clock_cycle());
        }
        if self.kind == TransmitterKind::Tunable && !self.tuned {
            self.tuned = true;
            let delay = self.pending_retune_slots as f64 * model.data_clock_cycle();
            return (DataStepOutcome::Idle, delay);
        }
        if data_ring.check(now, self.node_id).is_some() {
            warn!("tx {}: data slot collision at t={now}", self.node_id);
            return (DataStepOutcome::Collision, model.data_clock_cycle());
        }
        let Some(queued) = ram.pop() else {
            return (DataStepOutcome::Idle, model.data_clock_cycle());
        };
        if data_ring.live_count() >= model.max_data_packets() as usize {
            warn!(
                "tx {}: data ring {} at capacity, dropping ready packet",
                self.node_id,
                data_ring.id()
            );
            self.data_done = true;
            self.control_done = false;
            return (DataStepOutcome::CapacityExceeded, model.data_clock_cycle());
        }
        let packet = Packet::new(
            queued.payload,
            queued.generation_time,
            now,
            0.0,
            self.node_id,
            queued.destination,
        );
        let record = TransmissionRecord {
            source: self.node_id,
            destination: queued.destination,
            generation_time: queued.generation_time,
            transmission_time: now,
        };
        data_ring
            .add(self.node_id, packet.clone())
            .expect("own node id is always in range");
        debug!(
            "tx {}: sent data packet -> {} at t={now}",
            self.node_id, queued.destination
        );
        self.data_log.push(SentLogEntry {
            timestamp: now,
            packet,
        });
        self.data_done = true;
        self.control_done = false;
        (DataStepOutcome::Transmitted(record), model.data_clock_cycle())
    }
}
