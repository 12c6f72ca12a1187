//! Maximum flow with two interchangeable engines.
//!
//! [`RelabelToFront`] is a push-relabel implementation with a FIFO active queue, global
//! relabeling and the gap heuristic, running on an adjacency-list residual network.
//! [`FordFulkerson`] finds shortest augmenting paths by breadth-first search and runs on a dense
//! matrix by default. Both build their own residual network from a shared [`FlowProblem`], so
//! they can be run on the same input and cross-checked.
//!
//! ```
//! use pushflow::{FlowArc, FlowProblem, FordFulkerson, MatrixNetwork, MaxFlow, RelabelToFront};
//!
//! let arcs = [(0, 1, 10), (0, 2, 10), (1, 3, 10), (2, 3, 10), (1, 2, 1)]
//!     .into_iter()
//!     .map(|(u, v, c)| FlowArc::new(u, v, c))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let problem = FlowProblem::<i64>::from_arcs(4, 0, 3, arcs).unwrap();
//!
//! let mut rtf = RelabelToFront::new(&problem);
//! let mut ff = FordFulkerson::<MatrixNetwork<i64>>::new(&problem);
//! assert_eq!(rtf.run(), Ok(20));
//! assert_eq!(ff.run(), Ok(20));
//! ```

#![no_std]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
pub mod arc;
pub mod capacity;
pub mod dimacs;
pub mod error;
pub mod generate;
pub mod network;
pub mod problem;

pub use crate::algo::ford_fulkerson::FordFulkerson;
pub use crate::algo::relabel_to_front::{Phase, RelabelToFront, Vertex};
pub use crate::algo::{Counters, MaxFlow};
pub use crate::arc::{FlowArc, RawArc};
pub use crate::capacity::Capacity;
pub use crate::error::Error;
pub use crate::network::{ListNetwork, MatrixNetwork, ResidualEdge, ResidualNetwork};
pub use crate::problem::FlowProblem;
