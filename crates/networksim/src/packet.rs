//! The packet record carried on a ring.

use serde::{Deserialize, Serialize};

/// The payload carried by a packet. In abstract mode this is a `{node_id,
/// seq}` pair from the originating RAM's monotonic sequence counter; in
/// non-abstract mode it is the raw bit string produced by
/// [`crate::signal::ControlSignal::generate_packet`] or an equivalent data
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// `(source node id, monotonic sequence number)`.
    Abstract(usize, u64),
    /// A raw bit string, used when `abstract_mode == false`.
    Raw(String),
}

/// A packet in flight on a [`crate::ring::Ring`].
///
/// Named fields rather than a positional tuple: field order is documented
/// here once and never exposed positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// The packet's payload.
    pub payload: Payload,
    /// Time the packet was generated and queued in the RAM.
    pub generation_time: f64,
    /// Time the packet was injected onto the ring.
    pub transmission_time: f64,
    /// The position, in metres, where the packet entered the ring.
    pub entry_position: f64,
    /// The id of the node that injected the packet.
    pub source_node_id: usize,
    /// The id of the node the packet is addressed to.
    pub destination_node_id: usize,
}

impl Packet {
    /// Construct a new packet about to be injected onto a ring.
    pub fn new(
        payload: Payload,
        generation_time: f64,
        transmission_time: f64,
        entry_position: f64,
        source_node_id: usize,
        destination_node_id: usize,
    ) -> Self {
        Packet {
            payload,
            generation_time,
            transmission_time,
            entry_position,
            source_node_id,
            destination_node_id,
        }
    }

    /// `tx_time - gen_time`: the time spent queued before transmission.
    pub fn queueing_delay(&self) -> f64 {
        self.transmission_time - self.generation_time
    }
}

/// One row of a ring's append-only transmission log: either a packet being
/// `Added` or `Removed`, with the ring's live-packet count at the time of the
/// event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingLogEntry {
    /// The packet involved, snapshotted at the time of the event.
    pub packet: Packet,
    /// Time of reception, only set for `Removed` entries.
    pub reception_time: Option<f64>,
    /// `true` if this entry records an addition, `false` for a removal.
    pub added: bool,
    /// The id of the node where the packet was added or removed.
    pub node_id: usize,
    /// Number of packets live on the ring immediately after this event.
    pub live_count: usize,
}
