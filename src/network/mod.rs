//! Residual networks.
//!
//! Both engines mutate a residual network in place. The adjacency-list form ([`ListNetwork`])
//! gives the push-relabel engine O(1) access to an edge and its reverse, the dense form
//! ([`MatrixNetwork`]) gives the augmenting-path engine O(1) lookups for arbitrary pairs.

mod edge;
mod list;
mod matrix;

pub use edge::ResidualEdge;
pub use list::ListNetwork;
pub use matrix::{MatrixNeighbors, MatrixNetwork};

use num_traits::CheckedAdd;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::problem::FlowProblem;

/// Capacity lookup, capacity update and neighbor enumeration over a residual network.
///
/// For every ordered pair `(u, v)` the invariant `capacity(u, v) + capacity(v, u) ==
/// original_capacity(u, v) + original_capacity(v, u)` holds as long as capacities are only
/// changed through [`ResidualNetwork::push_flow`].
pub trait ResidualNetwork {
    type Capacity: Capacity;
    type Neighbors<'a>: Iterator<Item = usize>
    where
        Self: 'a;

    fn from_problem(problem: &FlowProblem<Self::Capacity>) -> Self
    where
        Self: Sized;

    fn vertex_count(&self) -> usize;

    fn source(&self) -> usize;

    fn sink(&self) -> usize;

    /// Remaining capacity of the arc `from -> to`, zero if the pair shares no arc.
    fn capacity(&self, from: usize, to: usize) -> Self::Capacity;

    /// Capacity of the arc `from -> to` before any flow was pushed.
    fn original_capacity(&self, from: usize, to: usize) -> Self::Capacity;

    fn set_capacity(
        &mut self,
        from: usize,
        to: usize,
        capacity: Self::Capacity,
    ) -> Result<(), Error>;

    /// Every vertex that shares an arc with `vertex`, in either direction.
    fn neighbors(&self, vertex: usize) -> Self::Neighbors<'_>;

    /// Moves `amount` of residual capacity from `from -> to` onto `to -> from`.
    fn push_flow(&mut self, from: usize, to: usize, amount: Self::Capacity) -> Result<(), Error> {
        let forward = self.capacity(from, to);
        let backward = self.capacity(to, from);
        debug_assert!(amount <= forward, "pushing more than the residual capacity");

        let backward = backward
            .checked_add(&amount)
            .ok_or(Error::ArithmeticOverflow)?;
        self.set_capacity(from, to, forward - amount)?;
        self.set_capacity(to, from, backward)
    }

    /// Net flow currently sent along `from -> to` (negative if it goes the other way).
    fn net_flow(&self, from: usize, to: usize) -> Self::Capacity {
        self.original_capacity(from, to) - self.capacity(from, to)
    }

    /// Net flow leaving `vertex`; zero for every vertex but the terminals once a flow is found.
    fn net_outflow(&self, vertex: usize) -> Self::Capacity {
        self.neighbors(vertex)
            .map(|v| self.net_flow(vertex, v))
            .sum()
    }

    /// The value of the current flow, i.e. the net flow into the sink.
    fn flow_value(&self) -> Self::Capacity {
        -self.net_outflow(self.sink())
    }
}
