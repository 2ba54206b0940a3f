//! Discrete-event scheduler and simulator façade for the optical ring
//! network model defined in `networksim`.
//!
//! Drives the domain types forward in virtual time: a single-threaded
//! cooperative scheduler dispatches each node's RAM, transmitter, and
//! receiver tasks in (wake_time, insertion_order) order, while the
//! [`simulator::Simulator`] façade owns every ring, node, and the two
//! append-only ledgers this produces.

pub mod info;
pub mod ledger;
pub mod scheduler;
pub mod simulator;
pub mod summary;
pub mod task;

pub use info::Info;
pub use ledger::{ErrorEntry, LatencyEntry, Ledger};
pub use scheduler::Scheduler;
pub use simulator::{Simulator, CONTROL_RING_ID};
pub use summary::Summary;
pub use task::TaskId;
