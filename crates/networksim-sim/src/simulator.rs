//! The simulator façade: owns every component and drives them forward in
//! virtual time through the scheduler.

use log::{debug, warn};

use networksim::{
    validate_mac_combination, ConfigError, Constants, ControlSignal, DataStepOutcome, ErrorKind,
    Model, Ram, ReceiverKind, ReceiverState, Ring, TimeUnit, TrafficMethod, TransmitterKind,
    TransmitterState,
};

use crate::ledger::{Ledger, LatencyEntry};
use crate::scheduler::Scheduler;
use crate::task::TaskId;

/// The id reserved for the single control ring, chosen outside the
/// `[0, num_nodes)` range data rings occupy.
pub const CONTROL_RING_ID: usize = usize::MAX;

/// The fully assembled network simulator: model, rings, per-node RAM/MAC
/// state, scheduler, and ledgers.
#[derive(Debug)]
pub struct Simulator {
    model: Model,
    codec: ControlSignal,
    control_ring: Ring,
    data_rings: Vec<Ring>,
    rams: Vec<Ram>,
    transmitters: Vec<TransmitterState>,
    receivers: Vec<ReceiverState>,
    scheduler: Scheduler,
    ledger: Ledger,
    until: f64,
}

impl Simulator {
    /// Build a simulator for `num_nodes` nodes (from `model.constants()`),
    /// running until virtual time `until`, with the given transmitter and
    /// receiver kinds and traffic method. Rejects FT-FR and TT-TR
    /// combinations.
    pub fn new(
        until: f64,
        model: Model,
        transmitter_kind: TransmitterKind,
        receiver_kind: ReceiverKind,
        traffic_method: TrafficMethod,
    ) -> Result<Self, ConfigError> {
        validate_mac_combination(transmitter_kind, receiver_kind)?;

        let num_nodes = model.constants().num_nodes;
        let control_ring = Ring::new(CONTROL_RING_ID, &model, false);
        let data_rings = (0..num_nodes).map(|i| Ring::new(i, &model, false)).collect();
        let rams: Vec<Ram> = (0..num_nodes)
            .map(|i| Ram::new(&model, i, traffic_method))
            .collect();
        let transmitters = (0..num_nodes)
            .map(|i| TransmitterState::new(&model, i, transmitter_kind))
            .collect();
        let receivers = (0..num_nodes)
            .map(|i| ReceiverState::new(i, receiver_kind))
            .collect();

        let mut scheduler = Scheduler::new();
        for (i, ram) in rams.iter().enumerate() {
            scheduler.schedule(ram.first_wake(0.0), TaskId::Ram(i));
            scheduler.schedule(model.control_clock_cycle(), TaskId::TxControl(i));
            scheduler.schedule(model.data_clock_cycle(), TaskId::TxData(i));
            scheduler.schedule(model.control_clock_cycle(), TaskId::RxControl(i));
            scheduler.schedule(model.data_clock_cycle(), TaskId::RxData(i));
        }

        Ok(Simulator {
            model,
            codec: ControlSignal::default(),
            control_ring,
            data_rings,
            rams,
            transmitters,
            receivers,
            scheduler,
            ledger: Ledger::new(),
            until,
        })
    }

    /// Convenience constructor using [`Constants::default`] and `ns` units.
    pub fn with_defaults(
        until: f64,
        num_nodes: usize,
        transmitter_kind: TransmitterKind,
        receiver_kind: ReceiverKind,
        traffic_method: TrafficMethod,
        max_data_packets: u64,
        max_control_packets: u64,
    ) -> Result<Self, ConfigError> {
        let constants = Constants {
            num_nodes,
            ..Constants::default()
        };
        let model = Model::new(
            constants,
            TimeUnit::Nanoseconds,
            max_data_packets,
            max_control_packets,
        )?;
        Simulator::new(until, model, transmitter_kind, receiver_kind, traffic_method)
    }

    /// The validated model this simulator was built from.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The control ring.
    pub fn control_ring(&self) -> &Ring {
        &self.control_ring
    }

    /// The per-node data rings, indexed by node/wavelength id.
    pub fn data_rings(&self) -> &[Ring] {
        &self.data_rings
    }

    /// The per-node traffic generators.
    pub fn rams(&self) -> &[Ram] {
        &self.rams
    }

    /// The per-node transmitter MAC state.
    pub fn transmitters(&self) -> &[TransmitterState] {
        &self.transmitters
    }

    /// The per-node receiver MAC state.
    pub fn receivers(&self) -> &[ReceiverState] {
        &self.receivers
    }

    /// The latency/error ledgers accumulated so far.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Current virtual time.
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Run the simulation to completion: dispatch tasks until virtual time
    /// reaches `until` or the scheduler empties.
    pub fn run(&mut self) {
        while let Some((now, task)) = self.scheduler.pop_next() {
            if now >= self.until {
                break;
            }
            self.dispatch(now, task);
        }
        self.flag_stragglers();
    }

    /// Abort the run: drop every pending wake.
    pub fn abort(&mut self) {
        self.scheduler.clear();
    }

    fn dispatch(&mut self, now: f64, task: TaskId) {
        match task {
            TaskId::Ram(i) => {
                let next = self.rams[i].step(now);
                self.scheduler.schedule(next, TaskId::Ram(i));
            }
            TaskId::TxControl(i) => self.dispatch_tx_control(i, now),
            TaskId::TxData(i) => self.dispatch_tx_data(i, now),
            TaskId::RxControl(i) => self.dispatch_rx_control(i, now),
            TaskId::RxData(i) => self.dispatch_rx_data(i, now),
        }
    }

    fn dispatch_tx_control(&mut self, i: usize, now: f64) {
        let probe_destination = self.rams[i].peek().map(|q| q.destination).unwrap_or(i);
        let target_ring_idx = self.transmitters[i].target_ring_for(probe_destination);

        let ram = &self.rams[i];
        let target_ring = &self.data_rings[target_ring_idx];
        let err = self.transmitters[i].step_control(
            ram,
            &mut self.control_ring,
            target_ring,
            &self.model,
            &self.codec,
            now,
        );
        if let Some(kind) = err {
            self.ledger.record_error(now, i, probe_destination, kind);
        }
        self.scheduler
            .schedule(now + self.model.control_clock_cycle(), TaskId::TxControl(i));
    }

    fn dispatch_tx_data(&mut self, i: usize, now: f64) {
        let target_ring_idx = self.transmitters[i].data_target_ring();
        let (rams, data_rings, transmitters) =
            (&mut self.rams, &mut self.data_rings, &mut self.transmitters);
        let (outcome, delay) =
            transmitters[i].step_data(&mut rams[i], &mut data_rings[target_ring_idx], &self.model, now);
        match outcome {
            DataStepOutcome::Transmitted(_) => {
                debug!("sim: node {i} transmitted data packet at t={now}");
            }
            DataStepOutcome::Collision => {
                self.ledger
                    .record_error(now, i, target_ring_idx, ErrorKind::DataSlotCollision);
            }
            DataStepOutcome::CapacityExceeded => {
                self.ledger
                    .record_error(now, i, target_ring_idx, ErrorKind::RingCapacityExceeded);
            }
            DataStepOutcome::Idle => {}
        }
        self.scheduler.schedule(now + delay, TaskId::TxData(i));
    }

    fn dispatch_rx_control(&mut self, i: usize, now: f64) {
        self.receivers[i].step_control(&mut self.control_ring, &self.codec, now);
        self.scheduler
            .schedule(now + self.model.control_clock_cycle(), TaskId::RxControl(i));
    }

    fn dispatch_rx_data(&mut self, i: usize, now: f64) {
        let ring_idx = self.receivers[i].listen_ring();
        let (outcome, delay) =
            self.receivers[i].step_data(&mut self.data_rings[ring_idx], &self.model, now);
        if let Some(record) = outcome {
            let queueing_delay = record.transmission_time - record.generation_time;
            let transfer_delay = record.reception_time - record.transmission_time;
            let data_packet_size = self.model.constants().data_packet_size;
            let rate = self
                .ledger
                .data_rate_including(now, data_packet_size);
            self.ledger.record_latency(
                LatencyEntry {
                    timestamp: now,
                    source: record.source,
                    destination: record.destination,
                    queueing_delay,
                    transfer_delay,
                    data_rate: rate,
                },
                data_packet_size,
            );
        }
        self.scheduler.schedule(now + delay, TaskId::RxData(i));
    }

    /// At run end, any receiver still `awaiting_data` completed its control
    /// handshake but never saw the matching data packet.
    fn flag_stragglers(&mut self) {
        let now = self.scheduler.now();
        for (i, rx) in self.receivers.iter().enumerate() {
            if rx.awaiting_data() {
                warn!("rx {i}: control handshake completed but no data arrived before run end");
                self.ledger
                    .record_error(now, usize::MAX, i, ErrorKind::MissingDataAfterControl);
            }
        }
    }
}
