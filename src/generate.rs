//! Seeded random networks for benchmarking.

use alloc::vec::Vec;

use itertools::iproduct;
use num_traits::FromPrimitive;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::arc::FlowArc;
use crate::capacity::Capacity;
use crate::error::Error;
use crate::problem::FlowProblem;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub vertex_count: usize,
    /// Percentage of all ordered vertex pairs that should carry an arc.
    pub density: u8,
    pub min_capacity: u64,
    pub max_capacity: u64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            vertex_count: 100,
            density: 20,
            min_capacity: 1,
            max_capacity: 1000,
            seed: 1,
        }
    }
}

/// Generates a random network with source `0` and sink `vertex_count - 1`.
///
/// No arc enters the source, leaves the sink, or runs opposite to an arc that was already
/// chosen. Those rules may leave the network with fewer arcs than `density` asks for.
pub fn random_network<C>(config: &GeneratorConfig) -> Result<FlowProblem<C>, Error>
where
    C: Capacity + FromPrimitive,
{
    let n = config.vertex_count;
    if n < 2 {
        return Err(Error::InvalidGenerator("at least two vertices are required"));
    }
    if config.density > 100 {
        return Err(Error::InvalidGenerator("density is a percentage"));
    }
    if config.min_capacity == 0 || config.min_capacity > config.max_capacity {
        return Err(Error::InvalidGenerator("capacity range must be positive and non-empty"));
    }

    let (source, sink) = (0, n - 1);
    let target = usize::from(config.density) * (n * n - n) / 100;

    let mut rng = Pcg64::seed_from_u64(config.seed);
    let mut pairs: Vec<(usize, usize)> = iproduct!(0..n, 0..n)
        .filter(|(i, j)| i != j)
        .collect();
    pairs.shuffle(&mut rng);

    let mut problem = FlowProblem::new(n, source, sink)?;
    let mut chosen = 0;
    for (i, j) in pairs {
        if chosen == target {
            break;
        }
        if i == sink || j == source || problem.capacity(j, i) > C::zero() {
            continue;
        }
        let capacity = rng.gen_range(config.min_capacity..=config.max_capacity);
        let capacity = C::from_u64(capacity).ok_or(Error::ArithmeticOverflow)?;
        problem.add_arc(FlowArc::new(i, j, capacity)?)?;
        chosen += 1;
    }

    log::debug!(
        "generated {} vertices and {} arcs (asked for {})",
        n,
        chosen,
        target
    );
    Ok(problem)
}
