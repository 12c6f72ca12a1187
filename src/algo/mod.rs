use serde::Serialize;

use crate::error::Error;

pub mod ford_fulkerson;
pub mod relabel_to_front;

/// Diagnostic counters collected during a run. They never influence the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub pushes: u64,
    pub relabels: u64,
    pub discharges: u64,
    pub gaps: u64,
    pub augmenting_paths: u64,
}

/// A max flow algorithm that owns its residual network.
pub trait MaxFlow {
    type Capacity;
    type Network;

    /// Runs the algorithm to completion and returns the max flow value. Running a finished
    /// engine again does nothing.
    fn run(&mut self) -> Result<Self::Capacity, Error>;

    /// The value of the current flow, read back from the residual network.
    fn max_flow(&self) -> Self::Capacity;

    fn counters(&self) -> &Counters;

    fn network(&self) -> &Self::Network;

    fn into_network(self) -> Self::Network;
}
