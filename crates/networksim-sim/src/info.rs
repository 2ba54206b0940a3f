//! Read-only query surface over a [`Simulator`]'s component history.

use networksim::error::ArgError;
use networksim::ram::GenerationLogEntry as RamLogEntry;
use networksim::receiver::ReceivedLogEntry;
use networksim::transmitter::SentLogEntry;
use networksim::RingLogEntry;

use crate::simulator::{Simulator, CONTROL_RING_ID};

/// A read-only handle over one simulator's history. Borrowed rather than
/// owned: Info never mutates, and is cheap to construct on demand.
pub struct Info<'a> {
    sim: &'a Simulator,
}

impl<'a> Info<'a> {
    /// Wrap a simulator for querying.
    pub fn new(sim: &'a Simulator) -> Self {
        Info { sim }
    }

    fn check_node(&self, node: usize) -> Result<(), ArgError> {
        let num_nodes = self.sim.model().constants().num_nodes;
        if node >= num_nodes {
            Err(ArgError::NodeOutOfRange { node_id: node, num_nodes })
        } else {
            Ok(())
        }
    }

    /// The transmission log of the control ring, or a data ring if
    /// `ring_id` is given.
    pub fn ring_log(&self, ring_id: Option<usize>) -> Result<&'a [RingLogEntry], ArgError> {
        match ring_id {
            None => Ok(self.sim.control_ring().log()),
            Some(id) => {
                self.check_node(id)?;
                Ok(self.sim.data_rings()[id].log())
            }
        }
    }

    /// The ring a node's `id` stands for, for readability at call sites.
    pub fn control_ring_id(&self) -> usize {
        CONTROL_RING_ID
    }

    /// A node's RAM traffic-generation history.
    pub fn ram_generation_log(&self, node: usize) -> Result<&'a [RamLogEntry], ArgError> {
        self.check_node(node)?;
        Ok(self.sim.rams()[node].generation_log())
    }

    /// A node's current RAM queue depth (packets generated but not yet
    /// transmitted).
    pub fn ram_queue_depth(&self, node: usize) -> Result<usize, ArgError> {
        self.check_node(node)?;
        Ok(self.sim.rams()[node].queue_len())
    }

    /// A node's transmitted control packets.
    pub fn transmitter_control_log(&self, node: usize) -> Result<&'a [SentLogEntry], ArgError> {
        self.check_node(node)?;
        Ok(self.sim.transmitters()[node].control_log())
    }

    /// A node's transmitted data packets.
    pub fn transmitter_data_log(&self, node: usize) -> Result<&'a [SentLogEntry], ArgError> {
        self.check_node(node)?;
        Ok(self.sim.transmitters()[node].data_log())
    }

    /// A node's received data packets.
    pub fn receiver_log(&self, node: usize) -> Result<&'a [ReceivedLogEntry], ArgError> {
        self.check_node(node)?;
        Ok(self.sim.receivers()[node].received_log())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use networksim::{ReceiverKind, TrafficMethod, TransmitterKind};

    #[test]
    fn rejects_out_of_range_node() {
        let mut sim = Simulator::with_defaults(
            50_000.0,
            4,
            TransmitterKind::Fixed,
            ReceiverKind::Tunable,
            TrafficMethod::Poisson,
            8,
            4,
        )
        .unwrap();
        sim.run();
        let info = Info::new(&sim);
        assert!(info.ram_generation_log(99).is_err());
        assert!(info.ram_generation_log(0).is_ok());
    }

    #[test]
    fn control_ring_log_is_queryable() {
        let mut sim = Simulator::with_defaults(
            50_000.0,
            4,
            TransmitterKind::Tunable,
            ReceiverKind::Fixed,
            TrafficMethod::Pareto,
            8,
            4,
        )
        .unwrap();
        sim.run();
        let info = Info::new(&sim);
        assert!(info.ring_log(None).is_ok());
    }
}
