//! Per-node traffic source: generates data packets with random destinations
//! and random inter-arrival times, queued for the node's transmitter.

use log::trace;

use crate::constants::Model;
use crate::dist::{Distribution, TrafficMethod};
use crate::packet::Payload;

/// One packet waiting in a RAM's queue: generation time, payload, and
/// destination. Dequeued strictly FIFO by the transmitter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedPacket {
    /// Time the packet was generated.
    pub generation_time: f64,
    /// The packet's payload.
    pub payload: Payload,
    /// Destination node id (never the RAM's own node).
    pub destination: usize,
}

/// One row of a RAM's generation history: a timestamp, the queue depth
/// immediately after, and the inter-arrival time that was just consumed to
/// reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationLogEntry {
    /// Time the packet was generated.
    pub timestamp: f64,
    /// The inter-arrival time consumed to reach this generation.
    pub interarrival: f64,
    /// Destination node id.
    pub destination: usize,
    /// Queue depth immediately after enqueueing.
    pub queue_depth: usize,
}

/// Per-node traffic generator. Modeled as a state object with a `step`
/// method rather than a coroutine: the scheduler calls `step` whenever
/// this RAM's wake time arrives, and `step` returns the next wake time.
#[derive(Debug, Clone)]
pub struct Ram {
    node_id: usize,
    num_nodes: usize,
    method: TrafficMethod,
    dist: Distribution,
    queue: std::collections::VecDeque<QueuedPacket>,
    sequence: u64,
    current_interarrival: f64,
    generation_log: Vec<GenerationLogEntry>,
}

impl Ram {
    /// Construct a RAM for `node_id`, seeded from its own node id so runs are
    /// reproducible.
    pub fn new(model: &Model, node_id: usize, method: TrafficMethod) -> Self {
        let mut dist = Distribution::new(model, node_id as u64);
        let current_interarrival = method.sample(&mut dist);
        Ram {
            node_id,
            num_nodes: model.constants().num_nodes,
            method,
            dist,
            queue: std::collections::VecDeque::new(),
            sequence: 0,
            current_interarrival,
            generation_log: Vec::new(),
        }
    }

    /// The node this RAM belongs to.
    pub fn node_id(&self) -> usize {
        self.node_id
    }

    /// Number of packets currently queued, awaiting transmission.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Peek the head of the queue without dequeueing.
    pub fn peek(&self) -> Option<&QueuedPacket> {
        self.queue.front()
    }

    /// Dequeue the head of the queue (FIFO).
    pub fn pop(&mut self) -> Option<QueuedPacket> {
        self.queue.pop_front()
    }

    /// The generation history (timestamp, inter-arrival, destination, queue
    /// depth).
    pub fn generation_log(&self) -> &[GenerationLogEntry] {
        &self.generation_log
    }

    /// Advance the RAM's traffic-generation process: generate a packet bound
    /// for a uniformly random destination (never this node), enqueue it, and
    /// sample the next inter-arrival. `now` must equal the wake time this
    /// `step` was previously scheduled for.
    ///
    /// Returns the absolute time of the next wake.
    pub fn step(&mut self, now: f64) -> f64 {
        let destination = self.sample_destination();
        let payload = Payload::Abstract(self.node_id, self.sequence);
        self.sequence += 1;
        self.queue.push_back(QueuedPacket {
            generation_time: now,
            payload,
            destination,
        });
        self.generation_log.push(GenerationLogEntry {
            timestamp: now,
            interarrival: self.current_interarrival,
            destination,
            queue_depth: self.queue.len(),
        });
        trace!(
            "ram {}: generated packet #{} -> {} (queue depth {})",
            self.node_id,
            self.sequence - 1,
            destination,
            self.queue.len()
        );
        let next_interarrival = self.method.sample(&mut self.dist);
        let wake_at = now + self.current_interarrival;
        self.current_interarrival = next_interarrival;
        wake_at
    }

    /// The absolute time of this RAM's very first wake, sampled at
    /// construction: the first wait is the initial interarrival sample.
    pub fn first_wake(&self, start: f64) -> f64 {
        start + self.current_interarrival
    }

    fn sample_destination(&mut self) -> usize {
        loop {
            let candidate = self.dist.uniform(self.num_nodes);
            if candidate != self.node_id {
                return candidate;
            }
        }
    }
}
