use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use num_traits::CheckedAdd;

use crate::algo::{Counters, MaxFlow};
use crate::error::Error;
use crate::network::{MatrixNetwork, ResidualNetwork};
use crate::problem::FlowProblem;

/// Augmenting-path max flow (Edmonds-Karp): breadth-first search for a shortest path with
/// positive residual capacity, then push its bottleneck, until no path is left.
///
/// Works over any [`ResidualNetwork`]; the dense matrix is the natural fit since the search only
/// needs pair lookups.
pub struct FordFulkerson<N: ResidualNetwork = MatrixNetwork<i64>> {
    network: N,
    // predecessor of every vertex on the last BFS tree, the source points to itself
    predecessor: Vec<Option<usize>>,
    queue: VecDeque<usize>,
    flow: N::Capacity,
    counters: Counters,
    done: bool,
}

impl<N: ResidualNetwork> FordFulkerson<N> {
    pub fn new(problem: &FlowProblem<N::Capacity>) -> Self {
        Self::with_network(N::from_problem(problem))
    }

    pub fn with_network(network: N) -> Self {
        let n = network.vertex_count();
        Self {
            network,
            predecessor: vec![None; n],
            queue: VecDeque::with_capacity(n),
            flow: Default::default(),
            counters: Counters::default(),
            done: false,
        }
    }

    /// Searches for an augmenting path from the source to the sink. Returns `true` iff the sink
    /// was reached; the path is then recorded in the predecessor list.
    pub fn find_path(&mut self) -> bool {
        let (source, sink) = (self.network.source(), self.network.sink());
        let zero = Default::default();

        self.predecessor.fill(None);
        self.queue.clear();
        self.predecessor[source] = Some(source);
        self.queue.push_back(source);

        let network = &self.network;
        while let Some(u) = self.queue.pop_front() {
            for v in network.neighbors(u) {
                if self.predecessor[v].is_none() && network.capacity(u, v) > zero {
                    self.predecessor[v] = Some(u);
                    if v == sink {
                        return true;
                    }
                    self.queue.push_back(v);
                }
            }
        }
        false
    }

    /// Pushes the bottleneck capacity along the path found by [`Self::find_path`] and returns
    /// it.
    pub fn augment_path(&mut self) -> Result<N::Capacity, Error> {
        let path = self.path();
        let bottleneck = path
            .windows(2)
            .map(|w| self.network.capacity(w[0], w[1]))
            .min()
            .ok_or(Error::MissingArc(self.network.source(), self.network.sink()))?;

        // Reject the whole path before touching any arc of it.
        let flow = self
            .flow
            .checked_add(&bottleneck)
            .ok_or(Error::ArithmeticOverflow)?;
        for w in path.windows(2) {
            self.network
                .capacity(w[1], w[0])
                .checked_add(&bottleneck)
                .ok_or(Error::ArithmeticOverflow)?;
        }

        for w in path.windows(2) {
            self.network.push_flow(w[0], w[1], bottleneck)?;
        }
        self.flow = flow;
        self.counters.augmenting_paths += 1;
        self.counters.pushes += path.len() as u64 - 1;

        log::trace!("augmented {} along {:?}", bottleneck, path);
        Ok(bottleneck)
    }

    /// Number of augmenting paths applied so far.
    pub fn iterations(&self) -> u64 {
        self.counters.augmenting_paths
    }

    // Vertices of the recorded path, from source to sink.
    fn path(&self) -> Vec<usize> {
        let (source, sink) = (self.network.source(), self.network.sink());
        let mut path = vec![sink];
        let mut v = sink;
        while v != source {
            match self.predecessor[v] {
                Some(u) => v = u,
                None => return Vec::new(),
            }
            path.push(v);
        }
        path.reverse();
        path
    }
}

impl<N: ResidualNetwork> MaxFlow for FordFulkerson<N> {
    type Capacity = N::Capacity;
    type Network = N;

    fn run(&mut self) -> Result<N::Capacity, Error> {
        if !self.done {
            while self.find_path() {
                self.augment_path()?;
            }
            self.done = true;

            log::debug!(
                "ford-fulkerson: flow {} after {} augmenting paths",
                self.flow,
                self.counters.augmenting_paths
            );
            debug_assert_eq!(self.flow, self.network.flow_value());
        }
        Ok(self.max_flow())
    }

    fn max_flow(&self) -> N::Capacity {
        self.network.flow_value()
    }

    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn network(&self) -> &N {
        &self.network
    }

    fn into_network(self) -> N {
        self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::FlowArc;
    use crate::network::ListNetwork;

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

    #[test]
    fn two_disjoint_routes() {
        let p = problem(
            4,
            0,
            3,
            &[(0, 1, 10), (0, 2, 10), (1, 3, 10), (2, 3, 10), (1, 2, 1)],
        );
        let mut ff = FordFulkerson::<MatrixNetwork<i64>>::new(&p);
        assert_eq!(ff.run(), Ok(20));
        assert_eq!(ff.iterations(), 2);
        assert_eq!(ff.max_flow(), 20);
    }

    #[test]
    fn single_arc() {
        let p = problem(2, 0, 1, &[(0, 1, 5)]);
        let mut ff = FordFulkerson::<MatrixNetwork<i64>>::new(&p);
        assert_eq!(ff.run(), Ok(5));
        assert_eq!(ff.network().capacity(1, 0), 5);
    }

    #[test]
    fn disconnected_terminals() {
        let p = problem(4, 0, 3, &[(0, 1, 3), (2, 3, 3)]);
        let mut ff = FordFulkerson::<MatrixNetwork<i64>>::new(&p);
        assert!(!ff.find_path());
        assert_eq!(ff.run(), Ok(0));
        assert_eq!(ff.iterations(), 0);
    }

    #[test]
    fn stepping_finds_shortest_path_first() {
        // the direct route 0 -> 3 is shorter than 0 -> 1 -> 2 -> 3
        let p = problem(4, 0, 3, &[(0, 1, 4), (1, 2, 4), (2, 3, 4), (0, 3, 2)]);
        let mut ff = FordFulkerson::<MatrixNetwork<i64>>::new(&p);

        assert!(ff.find_path());
        assert_eq!(ff.path(), vec![0, 3]);
        assert_eq!(ff.augment_path(), Ok(2));

        assert!(ff.find_path());
        assert_eq!(ff.path(), vec![0, 1, 2, 3]);
        assert_eq!(ff.augment_path(), Ok(4));

        assert!(!ff.find_path());
        assert_eq!(ff.max_flow(), 6);
    }

    #[test]
    fn uses_reverse_capacity() {
        // the first path 0 -> 1 -> 2 -> 5 blocks 0 -> 3 -> 2 and 1 -> 4 -> 5 unless it is undone
        let p = problem(
            6,
            0,
            5,
            &[(0, 1, 1), (0, 3, 1), (1, 2, 1), (1, 4, 1), (3, 2, 1), (2, 5, 1), (4, 5, 1)],
        );
        let mut ff = FordFulkerson::<ListNetwork<i64>>::new(&p);
        assert_eq!(ff.run(), Ok(2));
        let network = ff.network();
        for v in 1..5 {
            assert_eq!(network.net_outflow(v), 0);
        }
    }

    #[test]
    fn run_is_idempotent() {
        let p = problem(3, 0, 2, &[(0, 1, 3), (1, 2, 2)]);
        let mut ff = FordFulkerson::<MatrixNetwork<i64>>::new(&p);
        assert_eq!(ff.run(), Ok(2));
        let counters = *ff.counters();
        assert_eq!(ff.run(), Ok(2));
        assert_eq!(ff.max_flow(), 2);
        assert_eq!(*ff.counters(), counters);
    }

    #[test]
    fn overflow_rejects_the_whole_path() {
        // The second hop would push the reverse residual of 1 -> 2 past i32::MAX.
        let arcs = [(0, 1, i32::MAX), (1, 2, i32::MAX), (2, 1, 1)]
            .into_iter()
            .map(|(u, v, c)| FlowArc::new(u, v, c).unwrap());
        let p = FlowProblem::from_arcs(3, 0, 2, arcs).unwrap();
        let mut ff = FordFulkerson::<MatrixNetwork<i32>>::new(&p);

        assert_eq!(ff.run(), Err(Error::ArithmeticOverflow));
        assert_eq!(ff.max_flow(), 0);
        assert_eq!(ff.iterations(), 0);
        let network = ff.network();
        assert_eq!(network.capacity(0, 1), i32::MAX);
        assert_eq!(network.capacity(1, 0), 0);
        assert_eq!(network.capacity(2, 1), 1);
    }
}
