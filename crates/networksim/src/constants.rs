//! Immutable simulation parameters and the clock periods derived from them.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The time unit a [`Model`] (and everything built from it: rings, clocks,
/// distributions) is expressed in. Mixing units within one simulation is a
/// configuration error, so the unit lives on the model rather than being
/// re-derived per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Nanoseconds. The default; `unit_factor() == 1e-9`.
    Nanoseconds,
    /// Seconds; `unit_factor() == 1.0`.
    Seconds,
}

impl TimeUnit {
    /// Parse the `"ns"` / `"s"` time unit strings accepted in configuration.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "ns" => Ok(TimeUnit::Nanoseconds),
            "s" => Ok(TimeUnit::Seconds),
            other => Err(ConfigError::InvalidTimeUnit(other.to_string())),
        }
    }

    /// The factor applied to `speed * duration` to get metres, given a
    /// duration expressed in this unit.
    pub fn unit_factor(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1e-9,
            TimeUnit::Seconds => 1.0,
        }
    }
}

/// The physical and traffic constants of the ring network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    /// Ring circumference, in metres.
    pub length: f64,
    /// Propagation speed, in metres/second.
    pub speed: f64,
    /// Number of nodes around the ring.
    pub num_nodes: usize,
    /// Data packet size, in bytes.
    pub data_packet_size: u64,
    /// Control packet size, in bytes.
    pub control_packet_size: u64,
    /// Average offered bit rate per node, in bit/s.
    pub average_bit_rate: f64,
    /// Peak (burst) bit rate per node, in bit/s.
    pub maximum_bit_rate: f64,
    /// Tunable transceiver retuning time, in nanoseconds.
    pub tuning_time_ns: f64,
    /// If `true`, packets are abstract `{node_id, seq}` pairs rather than bit
    /// strings; see [`crate::signal::ControlSignal`].
    pub abstract_mode: bool,
}

impl Default for Constants {
    fn default() -> Self {
        Constants {
            length: 10_000.0,
            speed: 2e8,
            num_nodes: 8,
            data_packet_size: 1_500,
            control_packet_size: 16,
            average_bit_rate: 100e6,
            maximum_bit_rate: 1e9,
            tuning_time_ns: 500.0,
            abstract_mode: true,
        }
    }
}

/// The fully validated network model used throughout the simulator: constants
/// plus the time unit they are expressed in, plus the derived slot counts and
/// clock periods.
///
/// Validation happens once, at construction, rather than lazily the first
/// time a clock is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    constants: Constants,
    time_unit: TimeUnit,
    max_data_packets: u64,
    max_control_packets: u64,
}

impl Model {
    /// Build a [`Model`] from [`Constants`] plus an explicit maximum number of
    /// data/control packets allowed on a ring simultaneously (`M_d`, `M_c`).
    ///
    /// Both counts must be positive even integers.
    pub fn new(
        constants: Constants,
        time_unit: TimeUnit,
        max_data_packets: u64,
        max_control_packets: u64,
    ) -> Result<Model, ConfigError> {
        if max_data_packets == 0 || max_data_packets % 2 != 0 {
            return Err(ConfigError::InvalidSlotCount {
                clock: "data",
                count: max_data_packets,
            });
        }
        if max_control_packets == 0 || max_control_packets % 2 != 0 {
            return Err(ConfigError::InvalidSlotCount {
                clock: "control",
                count: max_control_packets,
            });
        }
        Ok(Model {
            constants,
            time_unit,
            max_data_packets,
            max_control_packets,
        })
    }

    /// The validated constants.
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// The time unit this model (and any ring/clock/distribution built from
    /// it) is expressed in.
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// `M_d`: the maximum number of data packets allowed on a data ring.
    pub fn max_data_packets(&self) -> u64 {
        self.max_data_packets
    }

    /// `M_c`: the maximum number of control packets allowed on the control
    /// ring.
    pub fn max_control_packets(&self) -> u64 {
        self.max_control_packets
    }

    /// Circulation time `T = L / v`, expressed in the model's time unit.
    pub fn circulation_time(&self) -> f64 {
        let seconds = self.constants.length / self.constants.speed;
        match self.time_unit {
            TimeUnit::Nanoseconds => seconds * 1e9,
            TimeUnit::Seconds => seconds,
        }
    }

    /// `t_s = T / M_d`: the data-slot clock period.
    pub fn data_clock_cycle(&self) -> f64 {
        self.circulation_time() / self.max_data_packets as f64
    }

    /// `t_c = T / M_c`: the control-slot clock period.
    pub fn control_clock_cycle(&self) -> f64 {
        self.circulation_time() / self.max_control_packets as f64
    }

    /// Packets per second implied by the peak bit rate, `sigma_pkt`.
    pub fn peak_packet_rate(&self) -> f64 {
        self.constants.maximum_bit_rate / (self.constants.data_packet_size as f64 * 8.0)
    }

    /// Packets per second implied by the average bit rate, `lambda_pkt`.
    pub fn average_packet_rate(&self) -> f64 {
        self.constants.average_bit_rate / (self.constants.data_packet_size as f64 * 8.0)
    }

    /// Tuning time expressed in the model's time unit.
    pub fn tuning_time(&self) -> f64 {
        match self.time_unit {
            TimeUnit::Nanoseconds => self.constants.tuning_time_ns,
            TimeUnit::Seconds => self.constants.tuning_time_ns / 1e9,
        }
    }

    /// Number of data-clock slots needed to retune across `|i - j|` rings,
    /// rounded up, used to build the TT `tuning_delay[N][N]` lookup table.
    pub fn tuning_delay_slots(&self) -> u64 {
        (self.tuning_time() / self.data_clock_cycle()).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_odd_slot_counts() {
        let c = Constants::default();
        assert!(Model::new(c, TimeUnit::Nanoseconds, 3, 4).is_err());
        assert!(Model::new(c, TimeUnit::Nanoseconds, 4, 3).is_err());
        assert!(Model::new(c, TimeUnit::Nanoseconds, 0, 4).is_err());
    }

    #[test]
    fn accepts_even_slot_counts() {
        let c = Constants::default();
        let m = Model::new(c, TimeUnit::Nanoseconds, 8, 4).unwrap();
        assert_eq!(m.max_data_packets(), 8);
        assert_eq!(m.max_control_packets(), 4);
    }

    #[test]
    fn clock_cycles_divide_circulation_time() {
        let c = Constants::default();
        let m = Model::new(c, TimeUnit::Nanoseconds, 8, 4).unwrap();
        let t = m.circulation_time();
        assert!((m.data_clock_cycle() * 8.0 - t).abs() < 1e-6);
        assert!((m.control_clock_cycle() * 4.0 - t).abs() < 1e-6);
    }

    #[test]
    fn time_unit_parse() {
        assert_eq!(TimeUnit::parse("ns").unwrap(), TimeUnit::Nanoseconds);
        assert_eq!(TimeUnit::parse("s").unwrap(), TimeUnit::Seconds);
        assert!(TimeUnit::parse("ms").is_err());
    }
}
