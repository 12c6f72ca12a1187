use alloc::collections::{btree_map::Entry, BTreeMap};

use itertools::iproduct;
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};

use crate::arc::FlowArc;
use crate::capacity::Capacity;
use crate::error::Error;

/// The input of a max flow computation: a vertex count, the two terminals and the capacities of
/// all directed arcs.
///
/// Parallel arcs between the same ordered pair of vertices are merged by summing their
/// capacities. Every engine builds its own residual network from a shared `FlowProblem`, so
/// running one engine never perturbs the input of another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowProblem<C> {
    vertex_count: usize,
    source: usize,
    sink: usize,
    // Keyed by ordered pair so that both residual representations see arcs in the same order.
    arcs: BTreeMap<(usize, usize), C>,
}

impl<C: Capacity> FlowProblem<C> {
    /// Creates a problem without arcs.
    pub fn new(vertex_count: usize, source: usize, sink: usize) -> Result<Self, Error> {
        check_vertex(source, vertex_count)?;
        check_vertex(sink, vertex_count)?;
        if source == sink {
            return Err(Error::SourceIsSink);
        }

        Ok(Self {
            vertex_count,
            source,
            sink,
            arcs: BTreeMap::new(),
        })
    }

    pub fn from_arcs<I>(
        vertex_count: usize,
        source: usize,
        sink: usize,
        arcs: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = FlowArc<C>>,
    {
        let mut problem = Self::new(vertex_count, source, sink)?;
        for arc in arcs {
            problem.add_arc(arc)?;
        }
        Ok(problem)
    }

    /// Builds a problem from a square capacity matrix where `matrix[i][j]` is the capacity of the
    /// arc `i -> j` and zero means "no arc".
    pub fn from_matrix<R>(matrix: &[R], source: usize, sink: usize) -> Result<Self, Error>
    where
        R: AsRef<[C]>,
    {
        let n = matrix.len();
        let mut problem = Self::new(n, source, sink)?;
        for (i, j) in iproduct!(0..n, 0..n) {
            let row = matrix[i].as_ref();
            let capacity = *row.get(j).ok_or(Error::VertexOutOfRange {
                vertex: j,
                count: row.len(),
            })?;
            if !capacity.is_zero() {
                problem.add_arc(FlowArc::new(i, j, capacity)?)?;
            }
        }
        Ok(problem)
    }

    /// Builds a problem from any `petgraph` graph, reading arc capacities through `capacity`.
    ///
    /// Edges whose capacity is zero are skipped, negative capacities and self loops are
    /// rejected.
    pub fn from_graph<G, F>(
        g: G,
        source: G::NodeId,
        sink: G::NodeId,
        mut capacity: F,
    ) -> Result<Self, Error>
    where
        G: IntoEdgeReferences + NodeIndexable,
        F: FnMut(G::EdgeRef) -> C,
    {
        let mut problem = Self::new(g.node_bound(), g.to_index(source), g.to_index(sink))?;
        for e in g.edge_references() {
            let (u, v) = (g.to_index(e.source()), g.to_index(e.target()));
            let c = capacity(e);
            if !c.is_zero() {
                problem.add_arc(FlowArc::new(u, v, c)?)?;
            }
        }
        Ok(problem)
    }

    /// Adds an arc, merging it with an existing arc between the same ordered pair.
    pub fn add_arc(&mut self, arc: FlowArc<C>) -> Result<(), Error> {
        check_vertex(arc.from(), self.vertex_count)?;
        check_vertex(arc.to(), self.vertex_count)?;

        match self.arcs.entry((arc.from(), arc.to())) {
            Entry::Vacant(e) => {
                e.insert(arc.capacity());
            }
            Entry::Occupied(mut e) => {
                let merged = e
                    .get()
                    .checked_add(&arc.capacity())
                    .ok_or(Error::ArithmeticOverflow)?;
                e.insert(merged);
            }
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn sink(&self) -> usize {
        self.sink
    }

    /// Number of distinct ordered pairs carrying capacity.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn capacity(&self, from: usize, to: usize) -> C {
        self.arcs.get(&(from, to)).copied().unwrap_or_else(C::zero)
    }

    /// All arcs as `(from, to, capacity)`, in ascending `(from, to)` order.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize, C)> + '_ {
        self.arcs.iter().map(|(&(u, v), &c)| (u, v, c))
    }
}

fn check_vertex(vertex: usize, count: usize) -> Result<(), Error> {
    if vertex < count {
        Ok(())
    } else {
        Err(Error::VertexOutOfRange { vertex, count })
    }
}
