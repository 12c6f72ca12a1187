//! Push-relabel max flow with a FIFO active queue, the gap heuristic and global relabeling.
//!
//! Heights start as exact BFS distances to the sink. Vertices are discharged in the order they
//! became active; a discharge drains its vertex completely, relabeling it whenever its edge list
//! is exhausted. When a relabel empties a height class below the source height, every vertex
//! above the gap is lifted past the source so its excess flows back there.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::{max, min};

use num_traits::Zero;

use crate::algo::{Counters, MaxFlow};
use crate::capacity::Capacity;
use crate::error::Error;
use crate::network::{ListNetwork, ResidualNetwork};
use crate::problem::FlowProblem;

/// Per-vertex state of the push-relabel engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex<C> {
    height: usize,
    excess: C,
    // index of the next edge to inspect in the vertex's edge list
    current: usize,
    pushes: u64,
    relabels: u64,
}

impl<C: Zero> Vertex<C> {
    fn new() -> Vertex<C> {
        Vertex {
            height: 0,
            excess: C::zero(),
            current: 0,
            pushes: 0,
            relabels: 0,
        }
    }
}

impl<C: Copy> Vertex<C> {
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn excess(&self) -> C {
        self.excess
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Pushes performed out of this vertex.
    pub fn pushes(&self) -> u64 {
        self.pushes
    }

    pub fn relabels(&self) -> u64 {
        self.relabels
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Discharging,
    Done,
}

pub struct RelabelToFront<C> {
    network: ListNetwork<C>,
    vertices: Vec<Vertex<C>>,
    // number of vertices at each height, indexed up to `2 * n - 1`
    height_count: Vec<usize>,
    active_queue: VecDeque<usize>,
    counters: Counters,
    phase: Phase,
}

impl<C: Capacity> RelabelToFront<C> {
    pub fn new(problem: &FlowProblem<C>) -> Self {
        Self::with_network(ListNetwork::from_problem(problem))
    }

    pub fn with_network(network: ListNetwork<C>) -> Self {
        let n = network.vertex_count();
        let source = network.source();

        let mut vertices = vec![Vertex::new(); n];
        vertices[source].height = n;

        let mut height_count = vec![0; 2 * n];
        height_count[0] = n - 1;
        height_count[n] = 1;

        RelabelToFront {
            network,
            vertices,
            height_count,
            active_queue: VecDeque::new(),
            counters: Counters::default(),
            phase: Phase::Initializing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn vertex(&self, v: usize) -> &Vertex<C> {
        &self.vertices[v]
    }

    pub fn vertices(&self) -> &[Vertex<C>] {
        &self.vertices
    }

    /// Number of vertices at every height.
    pub fn height_count(&self) -> &[usize] {
        &self.height_count
    }

    /// Vertices waiting to be discharged, front first.
    pub fn active(&self) -> impl Iterator<Item = usize> + '_ {
        self.active_queue.iter().copied()
    }

    /// Labels vertices with their distance to the sink and saturates every arc out of the
    /// source. Does nothing once the engine has left the initializing phase.
    pub fn initialize(&mut self) -> Result<(), Error> {
        if self.phase != Phase::Initializing {
            return Ok(());
        }

        self.set_initial_labels();

        let source = self.network.source();
        for index in 0..self.network.degree(source) {
            let weight = self.network.edge(source, index).weight;
            if weight > C::zero() {
                let node = &mut self.vertices[source];
                node.excess = node
                    .excess
                    .checked_add(&weight)
                    .ok_or(Error::ArithmeticOverflow)?;
                if let Err(err) = self.push(source, index) {
                    self.vertices[source].excess -= weight;
                    return Err(err);
                }
            }
        }

        self.phase = if self.active_queue.is_empty() {
            Phase::Done
        } else {
            Phase::Discharging
        };
        log::debug!(
            "relabel-to-front: {} active vertices after saturating the source",
            self.active_queue.len()
        );
        Ok(())
    }

    /// Discharges the vertex at the front of the active queue. Returns `false` once there is
    /// nothing left to do.
    pub fn step(&mut self) -> Result<bool, Error> {
        self.initialize()?;

        let Some(u) = self.active_queue.pop_front() else {
            self.phase = Phase::Done;
            return Ok(false);
        };
        self.discharge(u)?;

        if self.active_queue.is_empty() {
            self.phase = Phase::Done;
        }
        Ok(true)
    }

    // Breadth-first search backwards from the sink over arcs with residual capacity.
    fn set_initial_labels(&mut self) {
        let n = self.network.vertex_count();
        let (source, sink) = (self.network.source(), self.network.sink());

        let mut reached = vec![false; n];
        reached[sink] = true;
        reached[source] = true;

        let mut queue = VecDeque::from([sink]);
        while let Some(u) = queue.pop_front() {
            let dist = self.vertices[u].height + 1;
            for index in 0..self.network.degree(u) {
                let to = self.network.edge(u, index).to;
                // `to` can reach `u` iff the reverse arc `to -> u` has capacity left
                if !reached[to] && self.network.reverse(u, index).weight > C::zero() {
                    reached[to] = true;
                    self.set_height(to, dist);
                    queue.push_back(to);
                }
            }
        }

        // Whatever cannot reach the sink can only send flow back to the source.
        for v in 0..n {
            if !reached[v] {
                self.set_height(v, n);
            }
        }
    }

    fn discharge(&mut self, u: usize) -> Result<(), Error> {
        self.counters.discharges += 1;
        let n = self.network.vertex_count();

        while self.vertices[u].excess > C::zero() {
            let current = self.vertices[u].current;
            if current == self.network.degree(u) {
                let old_height = self.vertices[u].height;
                self.relabel(u)?;
                if old_height < n && self.height_count[old_height] == 0 {
                    self.gap(old_height);
                }
                self.vertices[u].current = 0;
            } else if self.can_push(u, current) {
                self.push(u, current)?;
            } else {
                self.vertices[u].current += 1;
            }
        }
        Ok(())
    }

    fn can_push(&self, u: usize, index: usize) -> bool {
        let edge = self.network.edge(u, index);
        edge.weight > C::zero() && self.vertices[u].height == self.vertices[edge.to].height + 1
    }

    fn push(&mut self, u: usize, index: usize) -> Result<(), Error> {
        let edge = *self.network.edge(u, index);
        let (source, sink) = (self.network.source(), self.network.sink());
        let amount = min(self.vertices[u].excess, edge.weight);
        debug_assert!(amount > C::zero());

        // Both terminals swallow whatever reaches them.
        let v = edge.to;
        let absorbed = v == sink || v == source;
        let excess = if absorbed {
            self.vertices[v].excess
        } else {
            self.vertices[v]
                .excess
                .checked_add(&amount)
                .ok_or(Error::ArithmeticOverflow)?
        };
        self.network.push_edge(u, index, amount)?;

        if !absorbed {
            if self.vertices[v].excess.is_zero() {
                // We weren't active before, but we are now.
                self.active_queue.push_back(v);
            }
            self.vertices[v].excess = excess;
        }
        self.vertices[u].excess -= amount;

        self.vertices[u].pushes += 1;
        self.counters.pushes += 1;
        log::trace!("push {} along {} -> {}", amount, u, v);
        Ok(())
    }

    fn relabel(&mut self, u: usize) -> Result<(), Error> {
        let min_height = self
            .network
            .outgoing(u)
            .iter()
            .filter(|e| e.weight > C::zero())
            .map(|e| self.vertices[e.to].height)
            .min()
            .ok_or(Error::NoResidualArc(u))?;
        self.set_height(u, min_height + 1);

        self.vertices[u].relabels += 1;
        self.counters.relabels += 1;
        log::trace!("relabel {} to height {}", u, min_height + 1);
        Ok(())
    }

    // Lifts every vertex at or above the empty height class `k` past the source.
    fn gap(&mut self, k: usize) {
        let n = self.network.vertex_count();
        let (source, sink) = (self.network.source(), self.network.sink());

        for v in 0..n {
            let height = self.vertices[v].height;
            if v != source && v != sink && height >= k {
                self.set_height(v, max(height, n + 1));
                self.vertices[v].current = 0;
            }
        }
        self.counters.gaps += 1;
        log::trace!("gap at height {}", k);
    }

    fn set_height(&mut self, v: usize, height: usize) {
        debug_assert!(height < self.height_count.len(), "height {height} out of bounds");
        let node = &mut self.vertices[v];
        self.height_count[node.height] -= 1;
        node.height = height;
        self.height_count[height] += 1;
    }
}

impl<C: Capacity> MaxFlow for RelabelToFront<C> {
    type Capacity = C;
    type Network = ListNetwork<C>;

    fn run(&mut self) -> Result<C, Error> {
        if self.phase == Phase::Done {
            return Ok(self.max_flow());
        }

        while self.step()? {}

        log::debug!(
            "relabel-to-front: flow {} with {} pushes, {} relabels, {} discharges, {} gaps",
            self.max_flow(),
            self.counters.pushes,
            self.counters.relabels,
            self.counters.discharges,
            self.counters.gaps
        );
        Ok(self.max_flow())
    }

    fn max_flow(&self) -> C {
        self.network.flow_value()
    }

    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn network(&self) -> &ListNetwork<C> {
        &self.network
    }

    fn into_network(self) -> ListNetwork<C> {
        self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::FlowArc;

    fn problem(
        n: usize,
        source: usize,
        sink: usize,
        arcs: &[(usize, usize, i64)],
    ) -> FlowProblem<i64> {
        let arcs = arcs
            .iter()
            .map(|&(u, v, c)| FlowArc::new(u, v, c).unwrap());
        FlowProblem::from_arcs(n, source, sink, arcs).unwrap()
    }

    fn heights(rtf: &RelabelToFront<i64>) -> Vec<usize> {
        rtf.vertices().iter().map(Vertex::height).collect()
    }

    #[test]
    fn two_disjoint_routes() {
        let p = problem(
            4,
            0,
            3,
            &[(0, 1, 10), (0, 2, 10), (1, 3, 10), (2, 3, 10), (1, 2, 1)],
        );
        let mut rtf = RelabelToFront::new(&p);
        assert_eq!(rtf.run(), Ok(20));
        assert_eq!(rtf.phase(), Phase::Done);
    }

    #[test]
    fn single_arc_needs_no_relabel() {
        let p = problem(2, 0, 1, &[(0, 1, 5)]);
        let mut rtf = RelabelToFront::new(&p);
        assert_eq!(rtf.run(), Ok(5));
        assert_eq!(rtf.counters().relabels, 0);
        assert_eq!(rtf.counters().gaps, 0);
        assert_eq!(rtf.counters().pushes, 1);
        assert_eq!(rtf.counters().discharges, 0);
    }

    #[test]
    fn isolated_source_finishes_during_initialization() {
        let p = problem(4, 0, 3, &[(1, 2, 3), (2, 3, 3)]);
        let mut rtf = RelabelToFront::new(&p);
        rtf.initialize().unwrap();
        assert_eq!(rtf.phase(), Phase::Done);
        assert_eq!(rtf.active().count(), 0);
        assert_eq!(rtf.run(), Ok(0));
        assert_eq!(rtf.counters().discharges, 0);
    }

    #[test]
    fn disconnected_terminals_return_everything_to_the_source() {
        let p = problem(4, 0, 3, &[(0, 1, 3), (2, 3, 3)]);
        let mut rtf = RelabelToFront::new(&p);
        assert_eq!(rtf.run(), Ok(0));
        assert!(rtf.vertices().iter().all(|v| v.excess() == 0));
        assert_eq!(rtf.network().capacity(0, 1), 3);
    }

    #[test]
    fn initial_labels_are_distances_to_the_sink() {
        // 4 cannot reach the sink at all
        let p = problem(5, 0, 3, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 4, 1)]);
        let mut rtf = RelabelToFront::new(&p);
        rtf.initialize().unwrap();
        assert_eq!(heights(&rtf), vec![5, 2, 1, 0, 5]);
        assert_eq!(rtf.height_count().iter().sum::<usize>(), 5);
        assert_eq!(rtf.height_count()[5], 2);
    }

    #[test]
    fn active_queue_is_fifo() {
        let p = problem(
            5,
            0,
            4,
            &[(0, 1, 2), (0, 2, 2), (0, 3, 2), (1, 4, 1), (2, 4, 1), (3, 4, 1)],
        );
        let mut rtf = RelabelToFront::new(&p);
        rtf.initialize().unwrap();
        assert_eq!(rtf.active().collect::<Vec<_>>(), vec![1, 2, 3]);

        assert_eq!(rtf.step(), Ok(true));
        assert_eq!(rtf.vertex(1).excess(), 0);
        assert_eq!(rtf.active().collect::<Vec<_>>(), vec![2, 3]);

        assert_eq!(rtf.run(), Ok(3));
    }

    #[test]
    fn gap_lifts_vertices_cut_off_from_the_sink() {
        let p = problem(4, 0, 3, &[(0, 1, 10), (1, 2, 10), (2, 3, 1)]);
        let mut rtf = RelabelToFront::new(&p);
        assert_eq!(rtf.run(), Ok(1));
        assert!(rtf.counters().gaps >= 1);
        assert!(rtf.vertex(1).height() > 4);
        assert!(rtf.vertex(2).height() > 4);
        assert_eq!(rtf.network().capacity(1, 0), 1);
    }

    #[test]
    fn invariants_hold_between_discharges() {
        let p = problem(
            7,
            0,
            6,
            &[
                (0, 1, 16),
                (0, 2, 13),
                (1, 2, 10),
                (2, 1, 4),
                (1, 3, 12),
                (3, 2, 9),
                (2, 4, 14),
                (4, 3, 7),
                (3, 6, 20),
                (4, 6, 4),
                (0, 5, 8),
                (5, 1, 3),
            ],
        );
        let n = p.vertex_count();
        let mut rtf = RelabelToFront::new(&p);
        rtf.initialize().unwrap();

        let mut last = heights(&rtf);
        loop {
            let network = rtf.network();
            for v in 0..n {
                let vertex = rtf.vertex(v);
                assert!(vertex.height() < 2 * n);
                assert!(vertex.excess() >= 0);
                assert!(vertex.height() >= last[v]);
                if v != p.source() && v != p.sink() {
                    assert_eq!(-network.net_outflow(v), vertex.excess());
                }
                for edge in network.outgoing(v) {
                    assert!(edge.weight >= 0);
                    assert_eq!(
                        edge.weight + network.capacity(edge.to, v),
                        p.capacity(v, edge.to) + p.capacity(edge.to, v)
                    );
                }
            }
            assert_eq!(rtf.vertex(p.source()).excess(), 0);
            assert_eq!(rtf.height_count().iter().sum::<usize>(), n);
            assert_eq!(rtf.vertex(p.source()).height(), n);
            assert!(rtf.active().all(|v| v != p.source() && v != p.sink()));

            last = heights(&rtf);
            if !rtf.step().unwrap() {
                break;
            }
        }

        assert_eq!(rtf.max_flow(), 23);
        for v in 1..n - 1 {
            assert_eq!(rtf.network().net_outflow(v), 0);
        }
    }

    #[test]
    fn dense_network_respects_operation_bounds() {
        let n = 6;
        let arcs: Vec<_> = (0..n)
            .flat_map(|u| (0..n).filter(move |&v| v != u).map(move |v| (u, v, 10)))
            .collect();
        let m = arcs.len() as u64;
        let p = problem(n, 0, n - 1, &arcs);
        let mut rtf = RelabelToFront::new(&p);
        assert_eq!(rtf.run(), Ok(50));

        let n = n as u64;
        let counters = rtf.counters();
        assert!(counters.relabels <= 2 * n * n);
        assert!(counters.pushes <= n * n * m);
        assert_eq!(
            counters.relabels,
            rtf.vertices().iter().map(Vertex::relabels).sum::<u64>()
        );
        assert_eq!(
            counters.pushes,
            rtf.vertices().iter().map(Vertex::pushes).sum::<u64>()
        );
    }

    #[test]
    fn max_flow_query_is_idempotent() {
        let p = problem(3, 0, 2, &[(0, 1, 4), (1, 2, 3), (0, 2, 1)]);
        let mut rtf = RelabelToFront::new(&p);
        assert_eq!(rtf.run(), Ok(4));
        let counters = *rtf.counters();
        assert_eq!(rtf.max_flow(), 4);
        assert_eq!(rtf.max_flow(), 4);
        assert_eq!(rtf.run(), Ok(4));
        assert_eq!(*rtf.counters(), counters);
        assert_eq!(rtf.step(), Ok(false));
    }

    #[test]
    fn overflow_leaves_state_untouched() {
        // Saturating 0 -> 1 would push the reverse residual past i32::MAX.
        let arcs = [(0, 1, i32::MAX), (1, 0, 1), (1, 2, i32::MAX)]
            .into_iter()
            .map(|(u, v, c)| FlowArc::new(u, v, c).unwrap());
        let p = FlowProblem::from_arcs(3, 0, 2, arcs).unwrap();
        let mut rtf = RelabelToFront::new(&p);

        assert_eq!(rtf.run(), Err(Error::ArithmeticOverflow));
        assert_eq!(rtf.active().count(), 0);
        assert_eq!(rtf.vertex(0).excess(), 0);
        assert_eq!(rtf.vertex(1).excess(), 0);
        assert_eq!(rtf.network().capacity(0, 1), i32::MAX);
        assert_eq!(rtf.network().capacity(1, 0), 1);
        assert_eq!(rtf.counters().pushes, 0);
    }
}
