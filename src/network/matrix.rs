use alloc::vec;
use alloc::vec::Vec;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::network::ResidualNetwork;
use crate::problem::FlowProblem;

/// Dense residual network storing one capacity per ordered pair of vertices.
///
/// Memory is quadratic in the vertex count, in exchange every lookup and update is O(1) and the
/// reverse of `(i, j)` is simply `(j, i)`.
#[derive(Clone, Debug)]
pub struct MatrixNetwork<C> {
    vertex_count: usize,
    source: usize,
    sink: usize,
    residual: Vec<C>,
    original: Vec<C>,
}

impl<C: Capacity> MatrixNetwork<C> {
    fn at(&self, from: usize, to: usize) -> usize {
        from * self.vertex_count + to
    }

    fn adjacent(&self, from: usize, to: usize) -> bool {
        let zero = C::zero();
        self.original[self.at(from, to)] > zero || self.original[self.at(to, from)] > zero
    }
}

/// Scans one row of a [`MatrixNetwork`] for vertices sharing an arc with `vertex`.
pub struct MatrixNeighbors<'a, C> {
    network: &'a MatrixNetwork<C>,
    vertex: usize,
    next: usize,
}

impl<'a, C: Capacity> Iterator for MatrixNeighbors<'a, C> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.next < self.network.vertex_count {
            let candidate = self.next;
            self.next += 1;
            if self.network.adjacent(self.vertex, candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

impl<C: Capacity> ResidualNetwork for MatrixNetwork<C> {
    type Capacity = C;
    type Neighbors<'a> = MatrixNeighbors<'a, C> where Self: 'a;

    fn from_problem(problem: &FlowProblem<C>) -> Self {
        let n = problem.vertex_count();
        let mut original = vec![C::zero(); n * n];
        for (u, v, c) in problem.arcs() {
            original[u * n + v] = c;
        }

        Self {
            vertex_count: n,
            source: problem.source(),
            sink: problem.sink(),
            residual: original.clone(),
            original,
        }
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn source(&self) -> usize {
        self.source
    }

    fn sink(&self) -> usize {
        self.sink
    }

    fn capacity(&self, from: usize, to: usize) -> C {
        self.residual[self.at(from, to)]
    }

    fn original_capacity(&self, from: usize, to: usize) -> C {
        self.original[self.at(from, to)]
    }

    fn set_capacity(&mut self, from: usize, to: usize, capacity: C) -> Result<(), Error> {
        for vertex in [from, to] {
            if vertex >= self.vertex_count {
                return Err(Error::VertexOutOfRange {
                    vertex,
                    count: self.vertex_count,
                });
            }
        }
        let at = self.at(from, to);
        self.residual[at] = capacity;
        Ok(())
    }

    fn neighbors(&self, vertex: usize) -> MatrixNeighbors<'_, C> {
        MatrixNeighbors {
            network: self,
            vertex,
            next: 0,
        }
    }
}
