//! Append-only latency and error bookkeeping, owned by the simulator façade
//! and never read mid-run.

use serde::{Deserialize, Serialize};

use networksim::ErrorKind;

/// One joined generation→transmission→reception record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyEntry {
    /// Time this entry was recorded (reception time).
    pub timestamp: f64,
    /// Source node id.
    pub source: usize,
    /// Destination node id.
    pub destination: usize,
    /// Time spent queued in the RAM before transmission.
    pub queueing_delay: f64,
    /// Time spent in flight on the ring.
    pub transfer_delay: f64,
    /// Cumulative data rate at the time of this reception, in bit/s.
    pub data_rate: f64,
}

/// One runtime transmission anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Time the anomaly was observed.
    pub timestamp: f64,
    /// Source node id.
    pub source: usize,
    /// Destination node id.
    pub destination: usize,
    /// The kind of anomaly.
    pub kind: ErrorKind,
}

/// The simulator's two append-only ledgers.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    latency: Vec<LatencyEntry>,
    errors: Vec<ErrorEntry>,
    cumulative_data_bits: u64,
}

impl Ledger {
    /// Construct an empty ledger.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Append a latency entry and fold its data volume into the running
    /// cumulative bit count used by [`Self::data_rate`].
    pub fn record_latency(&mut self, entry: LatencyEntry, data_packet_size: u64) {
        self.cumulative_data_bits += data_packet_size * 8;
        self.latency.push(entry);
    }

    /// Append an error entry.
    pub fn record_error(&mut self, timestamp: f64, source: usize, destination: usize, kind: ErrorKind) {
        self.errors.push(ErrorEntry {
            timestamp,
            source,
            destination,
            kind,
        });
    }

    /// The latency ledger, in the order entries were recorded.
    pub fn latency_entries(&self) -> &[LatencyEntry] {
        &self.latency
    }

    /// The error ledger, in the order entries were recorded.
    pub fn error_entries(&self) -> &[ErrorEntry] {
        &self.errors
    }

    /// `cumulative_bits_received / t`, `0.0` at `t == 0`.
    pub fn data_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            0.0
        } else {
            self.cumulative_data_bits as f64 / t
        }
    }

    /// The data rate that would be reported at `t` if one more
    /// `data_packet_size`-byte packet were folded in right now; used to
    /// stamp a [`LatencyEntry`] with the rate as of its own reception.
    pub fn data_rate_including(&self, t: f64, data_packet_size: u64) -> f64 {
        if t <= 0.0 {
            0.0
        } else {
            (self.cumulative_data_bits + data_packet_size * 8) as f64 / t
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(src: usize, dst: usize) -> LatencyEntry {
        LatencyEntry {
            timestamp: 10.0,
            source: src,
            destination: dst,
            queueing_delay: 1.0,
            transfer_delay: 2.0,
            data_rate: 0.0,
        }
    }

    #[test]
    fn data_rate_grows_with_recorded_packets() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.data_rate(100.0), 0.0);
        ledger.record_latency(entry(0, 1), 1_500);
        let rate = ledger.data_rate(100.0);
        assert!((rate - (1_500.0 * 8.0 / 100.0)).abs() < 1e-9);
    }

    #[test]
    fn errors_recorded_in_order() {
        let mut ledger = Ledger::new();
        ledger.record_error(1.0, 0, 1, ErrorKind::ControlSlotCollision);
        ledger.record_error(2.0, 1, 2, ErrorKind::DataSlotCollision);
        let kinds: Vec<_> = ledger.error_entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::ControlSlotCollision, ErrorKind::DataSlotCollision]
        );
    }
}
