//! Aggregate simulation statistics, plus a dependency-free CSV writer for
//! the out-of-core persistence interface.

use std::collections::HashMap;
use std::fmt::Write as _;

use networksim::ErrorKind;

use crate::simulator::Simulator;

/// Overall simulation statistics computed from a simulator's final state
/// and ledgers. Computed once; does not stay live against further `run()`
/// calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Total packets generated across all RAMs.
    pub total_generated: u64,
    /// Total data packets transmitted across all nodes.
    pub total_transmitted: u64,
    /// Total data packets received across all nodes.
    pub total_received: u64,
    /// Packets generated per node, indexed by node id.
    pub per_node_generated: Vec<u64>,
    /// Packets transmitted per node, indexed by node id.
    pub per_node_transmitted: Vec<u64>,
    /// Packets received per node, indexed by node id.
    pub per_node_received: Vec<u64>,
    /// Each node's share of `total_generated`, as a percentage (0-100).
    /// `0.0` for every node when `total_generated == 0`.
    pub per_node_generated_share: Vec<f64>,
    /// Each node's share of `total_transmitted`, as a percentage (0-100).
    pub per_node_transmitted_share: Vec<f64>,
    /// Each node's share of `total_received`, as a percentage (0-100).
    pub per_node_received_share: Vec<f64>,
    /// `[src][dst]`: average transfer delay in the model's time unit,
    /// `NaN` if no packet has travelled that src/dst pair.
    pub latency_matrix: Vec<Vec<f64>>,
    /// Count of each runtime anomaly kind observed.
    pub error_counts: HashMap<ErrorKind, u64>,
    /// The data rate at the end of the run, in bit/s.
    pub final_data_rate: f64,
}

/// Each count's percentage share of `total`, `0.0` across the board when
/// `total == 0` (nothing generated/transmitted/received yet).
fn shares(counts: &[u64], total: u64) -> Vec<f64> {
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|&count| 100.0 * count as f64 / total as f64)
        .collect()
}

impl Summary {
    /// Compute a summary snapshot of `sim`'s current state.
    pub fn compute(sim: &Simulator) -> Self {
        let num_nodes = sim.model().constants().num_nodes;

        let per_node_generated: Vec<u64> = sim
            .rams()
            .iter()
            .map(|r| r.generation_log().len() as u64)
            .collect();
        let per_node_transmitted: Vec<u64> = sim
            .transmitters()
            .iter()
            .map(|t| t.data_log().len() as u64)
            .collect();
        let per_node_received: Vec<u64> = sim
            .receivers()
            .iter()
            .map(|r| r.received_log().len() as u64)
            .collect();

        let mut latency_sum = vec![vec![0.0_f64; num_nodes]; num_nodes];
        let mut latency_count = vec![vec![0_u64; num_nodes]; num_nodes];
        for entry in sim.ledger().latency_entries() {
            latency_sum[entry.source][entry.destination] += entry.transfer_delay;
            latency_count[entry.source][entry.destination] += 1;
        }
        let latency_matrix = (0..num_nodes)
            .map(|src| {
                (0..num_nodes)
                    .map(|dst| {
                        if latency_count[src][dst] == 0 {
                            f64::NAN
                        } else {
                            latency_sum[src][dst] / latency_count[src][dst] as f64
                        }
                    })
                    .collect()
            })
            .collect();

        let mut error_counts = HashMap::new();
        for entry in sim.ledger().error_entries() {
            *error_counts.entry(entry.kind).or_insert(0) += 1;
        }

        let total_generated: u64 = per_node_generated.iter().sum();
        let total_transmitted: u64 = per_node_transmitted.iter().sum();
        let total_received: u64 = per_node_received.iter().sum();
        let per_node_generated_share = shares(&per_node_generated, total_generated);
        let per_node_transmitted_share = shares(&per_node_transmitted, total_transmitted);
        let per_node_received_share = shares(&per_node_received, total_received);

        Summary {
            total_generated,
            total_transmitted,
            total_received,
            per_node_generated,
            per_node_transmitted,
            per_node_received,
            per_node_generated_share,
            per_node_transmitted_share,
            per_node_received_share,
            latency_matrix,
            error_counts,
            final_data_rate: sim.ledger().data_rate(sim.now()),
        }
    }

    /// Render the per-node counts and shares as CSV: one row per node,
    /// columns `node,generated,transmitted,received,generated_pct,
    /// transmitted_pct,received_pct`. No external CSV crate is used,
    /// matching the out-of-core scope for persistence.
    pub fn per_node_csv(&self) -> String {
        let mut out = String::from(
            "node,generated,transmitted,received,generated_pct,transmitted_pct,received_pct\n",
        );
        for node in 0..self.per_node_generated.len() {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{}",
                node,
                self.per_node_generated[node],
                self.per_node_transmitted[node],
                self.per_node_received[node],
                self.per_node_generated_share[node],
                self.per_node_transmitted_share[node],
                self.per_node_received_share[node]
            );
        }
        out
    }

    /// Render the latency matrix as CSV: one row per source node, one
    /// column per destination node, `nan` where no packet was observed.
    pub fn latency_matrix_csv(&self) -> String {
        let mut out = String::new();
        for row in &self.latency_matrix {
            let cells: Vec<String> = row
                .iter()
                .map(|v| {
                    if v.is_nan() {
                        "nan".to_string()
                    } else {
                        v.to_string()
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join(","));
        }
        out
    }
}
