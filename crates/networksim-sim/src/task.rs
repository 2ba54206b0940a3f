//! Identifiers for the cooperative tasks the scheduler dispatches.

/// A schedulable unit of work, namespaced by node id. Each variant
/// corresponds to one of the `step` functions in `networksim`: a RAM's
/// traffic generation, a transmitter's control/data task, or a receiver's
/// control/data task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    /// The traffic generator at a node.
    Ram(usize),
    /// A transmitter's control-plane task at a node.
    TxControl(usize),
    /// A transmitter's data-plane task at a node.
    TxData(usize),
    /// A receiver's control-plane task at a node.
    RxControl(usize),
    /// A receiver's data-plane task at a node.
    RxData(usize),
}

impl TaskId {
    /// The node this task belongs to.
    pub fn node_id(self) -> usize {
        match self {
            TaskId::Ram(n)
            | TaskId::TxControl(n)
            | TaskId::TxData(n)
            | TaskId::RxControl(n)
            | TaskId::RxData(n) => n,
        }
    }
}
