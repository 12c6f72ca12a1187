use displaydoc::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Vertex {vertex} is out of range for a network of {count} vertices
    VertexOutOfRange { vertex: usize, count: usize },
    /// Source and sink must be different vertices
    SourceIsSink,
    /// Invalid arc from vertex {0} to itself
    SelfLoop(usize),
    /// Invalid arc capacity, expected positive value
    NonPositiveCapacity,
    /// Arithmetic overflow while accumulating capacities
    ArithmeticOverflow,
    /// No residual edge between vertices {0} and {1}
    MissingArc(usize, usize),
    /// Vertex {0} has excess flow but no residual arc to push it along
    NoResidualArc(usize),
    /// Line {line}: {reason}
    Parse { line: usize, reason: &'static str },
    /// Invalid generator configuration: {0}
    InvalidGenerator(&'static str),
}
