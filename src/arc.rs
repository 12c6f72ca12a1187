use num_traits::Zero;
use serde::Deserialize;

use crate::error::Error;

/// A directed input arc with a strictly positive capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(
    try_from = "RawArc<C>",
    bound(deserialize = "C: Zero + PartialOrd + Deserialize<'de>")
)]
pub struct FlowArc<C> {
    from: usize,
    to: usize,
    capacity: C,
}

impl<C> FlowArc<C>
where
    C: Zero + PartialOrd,
{
    pub fn new(from: usize, to: usize, capacity: C) -> Result<Self, Error> {
        if from == to {
            Err(Error::SelfLoop(from))
        } else if capacity <= C::zero() {
            Err(Error::NonPositiveCapacity)
        } else {
            Ok(Self { from, to, capacity })
        }
    }
}

impl<C: Copy> FlowArc<C> {
    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn capacity(&self) -> C {
        self.capacity
    }
}

/// The unvalidated form of an arc, as it appears in a CSV row.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct RawArc<C> {
    pub from: usize,
    pub to: usize,
    pub capacity: C,
}

impl<C> TryFrom<RawArc<C>> for FlowArc<C>
where
    C: Zero + PartialOrd,
{
    type Error = Error;

    fn try_from(a: RawArc<C>) -> Result<Self, Self::Error> {
        Self::new(a.from, a.to, a.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_self_loops_and_empty_arcs() {
        assert_eq!(FlowArc::new(3, 3, 1), Err(Error::SelfLoop(3)));
        assert_eq!(FlowArc::new(0, 1, 0), Err(Error::NonPositiveCapacity));
        assert_eq!(FlowArc::new(0, 1, -4), Err(Error::NonPositiveCapacity));
    }

    #[test]
    fn raw_arc_conversion() {
        let raw = RawArc {
            from: 2,
            to: 5,
            capacity: 7i64,
        };
        let arc = FlowArc::try_from(raw).unwrap();
        assert_eq!((arc.from(), arc.to(), arc.capacity()), (2, 5, 7));

        let raw = RawArc {
            from: 1,
            to: 1,
            capacity: 7i64,
        };
        assert_eq!(FlowArc::try_from(raw), Err(Error::SelfLoop(1)));
    }
}
