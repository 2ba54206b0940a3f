//! The ring: holds in-flight packets and answers whether one is currently at
//! a given node, by computing its position analytically rather than shifting
//! elements every tick.

use log::trace;

use crate::constants::Model;
use crate::error::ArgError;
use crate::packet::{Packet, RingLogEntry};

/// Position tolerance used when comparing a packet's computed location
/// against a node's location or the ring's wrap-around point.
pub const POSITION_EPSILON: f64 = 1e-2;

/// One of the rings in the network: either the single control ring or one of
/// the per-wavelength data rings.
#[derive(Debug, Clone)]
pub struct Ring {
    id: usize,
    reversed: bool,
    node_positions: Vec<f64>,
    length: f64,
    speed: f64,
    unit_factor: f64,
    packets: Vec<Packet>,
    added_count: u64,
    removed_count: u64,
    log: Vec<RingLogEntry>,
}

impl Ring {
    /// Construct a ring for the given model. `node_positions[k] = L * k / N`.
    pub fn new(id: usize, model: &Model, reversed: bool) -> Self {
        let num_nodes = model.constants().num_nodes;
        let length = model.constants().length;
        let node_positions = (0..num_nodes)
            .map(|k| length * k as f64 / num_nodes as f64)
            .collect();
        Ring {
            id,
            reversed,
            node_positions,
            length,
            speed: model.constants().speed,
            unit_factor: model.time_unit().unit_factor(),
            packets: Vec::new(),
            added_count: 0,
            removed_count: 0,
            log: Vec::new(),
        }
    }

    /// The ring's identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of packets currently in flight on this ring.
    pub fn live_count(&self) -> usize {
        self.packets.len()
    }

    /// The append-only transmission log (additions and removals).
    pub fn log(&self) -> &[RingLogEntry] {
        &self.log
    }

    /// Add a packet to the ring, entering at `src_node`'s location.
    pub fn add(
        &mut self,
        src_node: usize,
        packet: Packet,
    ) -> Result<(), ArgError> {
        let entry_position = *self.node_positions.get(src_node).ok_or(
            ArgError::NodeOutOfRange {
                node_id: src_node,
                num_nodes: self.node_positions.len(),
            },
        )?;
        let mut packet = packet;
        packet.entry_position = entry_position;
        self.added_count += 1;
        self.log.push(RingLogEntry {
            packet: packet.clone(),
            reception_time: None,
            added: true,
            node_id: src_node,
            live_count: self.packets.len() + 1,
        });
        trace!(
            "ring {}: add packet {} -> {} (live = {})",
            self.id,
            packet.source_node_id,
            packet.destination_node_id,
            self.packets.len() + 1
        );
        self.packets.push(packet);
        Ok(())
    }

    /// Remove a packet identified by reference equality (matched on its
    /// generation/transmission time and source/destination, which are unique
    /// per packet within one simulation).
    pub fn remove(&mut self, node_id: usize, packet: &Packet, reception_time: f64) -> bool {
        if let Some(pos) = self.packets.iter().position(|p| p == packet) {
            let removed = self.packets.remove(pos);
            self.removed_count += 1;
            self.log.push(RingLogEntry {
                packet: removed,
                reception_time: Some(reception_time),
                added: false,
                node_id,
                live_count: self.packets.len(),
            });
            trace!(
                "ring {}: remove packet at node {} (live = {})",
                self.id,
                node_id,
                self.packets.len()
            );
            true
        } else {
            false
        }
    }

    /// Is a packet currently at `node`'s location? Returns the first matching
    /// packet in insertion order.
    pub fn check(&self, current_time: f64, node: usize) -> Option<&Packet> {
        let node_position = *self.node_positions.get(node)?;
        self.packets
            .iter()
            .find(|packet| self.position_matches(packet, current_time, node_position))
    }

    /// Like [`Self::check`], but also requires the packet be addressed to
    /// `destination`. A node taps every packet passing its physical location
    /// but only acts on ones meant for it.
    pub fn check_addressed_to(
        &self,
        current_time: f64,
        node: usize,
        destination: usize,
    ) -> Option<&Packet> {
        let node_position = *self.node_positions.get(node)?;
        self.packets.iter().find(|packet| {
            packet.destination_node_id == destination
                && self.position_matches(packet, current_time, node_position)
        })
    }

    fn position_matches(&self, packet: &Packet, current_time: f64, node_position: f64) -> bool {
        let elapsed = current_time - packet.transmission_time;
        let distance = elapsed * self.speed * self.unit_factor;
        let pos = packet.entry_position + distance;
        let mut pos_ring = pos.rem_euclid(self.length);
        if self.reversed {
            pos_ring =
                (packet.entry_position - (pos_ring - packet.entry_position)).rem_euclid(self.length);
        }
        if (pos_ring - self.length).abs() < POSITION_EPSILON {
            pos_ring = 0.0;
        }
        (pos_ring - node_position).abs() < POSITION_EPSILON
    }
}
