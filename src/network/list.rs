use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use core::iter::Map;
use core::slice::Iter;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::network::{ResidualEdge, ResidualNetwork};
use crate::problem::FlowProblem;

/// Adjacency-list residual network.
///
/// Each vertex owns a vector of outgoing [`ResidualEdge`]s whose order is fixed at construction.
/// Every input arc gets a paired reverse edge; arcs given in both directions share one pair.
#[derive(Clone, Debug)]
pub struct ListNetwork<C> {
    source: usize,
    sink: usize,
    edges: Vec<Vec<ResidualEdge<C>>>,
    // (from, to) -> position of that edge in `edges[from]`
    index: BTreeMap<(usize, usize), usize>,
}

impl<C: Capacity> ListNetwork<C> {
    /// The outgoing edges of `vertex`, in construction order.
    pub fn outgoing(&self, vertex: usize) -> &[ResidualEdge<C>] {
        &self.edges[vertex]
    }

    pub fn degree(&self, vertex: usize) -> usize {
        self.edges[vertex].len()
    }

    pub fn edge(&self, vertex: usize, index: usize) -> &ResidualEdge<C> {
        &self.edges[vertex][index]
    }

    /// The reverse of the `index`-th outgoing edge of `vertex`.
    pub fn reverse(&self, vertex: usize, index: usize) -> &ResidualEdge<C> {
        let edge = &self.edges[vertex][index];
        &self.edges[edge.to][edge.reverse]
    }

    /// Pushes `amount` along the `index`-th outgoing edge of `vertex` in O(1).
    pub fn push_edge(&mut self, vertex: usize, index: usize, amount: C) -> Result<(), Error> {
        let edge = self.edges[vertex][index];
        debug_assert!(amount <= edge.weight, "pushing more than the residual capacity");

        let back = &mut self.edges[edge.to][edge.reverse];
        back.weight = back
            .weight
            .checked_add(&amount)
            .ok_or(Error::ArithmeticOverflow)?;
        self.edges[vertex][index].weight -= amount;
        Ok(())
    }

    fn position(&self, from: usize, to: usize) -> Option<usize> {
        self.index.get(&(from, to)).copied()
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), Error> {
        if vertex < self.edges.len() {
            Ok(())
        } else {
            Err(Error::VertexOutOfRange {
                vertex,
                count: self.edges.len(),
            })
        }
    }
}

type EdgeTargets<'a, C> = Map<Iter<'a, ResidualEdge<C>>, fn(&ResidualEdge<C>) -> usize>;

fn target<C>(edge: &ResidualEdge<C>) -> usize {
    edge.to
}

impl<C: Capacity> ResidualNetwork for ListNetwork<C> {
    type Capacity = C;
    type Neighbors<'a> = EdgeTargets<'a, C> where Self: 'a;

    fn from_problem(problem: &FlowProblem<C>) -> Self {
        let mut edges: Vec<Vec<ResidualEdge<C>>> = vec![Vec::new(); problem.vertex_count()];
        let mut index = BTreeMap::new();

        for (u, v, c) in problem.arcs() {
            // The arc may already exist as the reverse half of `v -> u`.
            if let Some(&i) = index.get(&(u, v)) {
                let edge: &mut ResidualEdge<C> = &mut edges[u][i];
                edge.weight = c;
                edge.capacity = c;
                continue;
            }

            let (iu, iv) = (edges[u].len(), edges[v].len());
            edges[u].push(ResidualEdge::new(u, v, c, iv));
            edges[v].push(ResidualEdge::new(v, u, C::zero(), iu));
            index.insert((u, v), iu);
            index.insert((v, u), iv);
        }

        log::trace!(
            "built adjacency lists for {} vertices and {} residual edges",
            edges.len(),
            index.len()
        );

        Self {
            source: problem.source(),
            sink: problem.sink(),
            edges,
            index,
        }
    }

    fn vertex_count(&self) -> usize {
        self.edges.len()
    }

    fn source(&self) -> usize {
        self.source
    }

    fn sink(&self) -> usize {
        self.sink
    }

    fn capacity(&self, from: usize, to: usize) -> C {
        self.position(from, to)
            .map_or_else(C::zero, |i| self.edges[from][i].weight)
    }

    fn original_capacity(&self, from: usize, to: usize) -> C {
        self.position(from, to)
            .map_or_else(C::zero, |i| self.edges[from][i].capacity)
    }

    fn set_capacity(&mut self, from: usize, to: usize, capacity: C) -> Result<(), Error> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        let i = self.position(from, to).ok_or(Error::MissingArc(from, to))?;
        self.edges[from][i].weight = capacity;
        Ok(())
    }

    fn neighbors(&self, vertex: usize) -> Self::Neighbors<'_> {
        let target: fn(&ResidualEdge<C>) -> usize = target;
        self.edges[vertex].iter().map(target)
    }
}
