/// One directed arc of an adjacency-list residual network.
///
/// The reverse arc lives at `edges[to][reverse]`, so an edge and its reverse form a stable index
/// pair instead of a pair of references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResidualEdge<C> {
    pub from: usize,
    pub to: usize,
    /// Remaining capacity.
    pub weight: C,
    /// Capacity before any flow was pushed.
    pub capacity: C,
    /// Index of the reverse arc in the edge list of `to`.
    pub reverse: usize,
}

impl<C: Copy> ResidualEdge<C> {
    pub(crate) fn new(from: usize, to: usize, capacity: C, reverse: usize) -> Self {
        Self {
            from,
            to,
            weight: capacity,
            capacity,
            reverse,
        }
    }
}
