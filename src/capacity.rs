use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use num_traits::{CheckedAdd, Zero};

/// A trait representing an arc capacity, which is typically a signed integer.
///
/// Residual bookkeeping subtracts original from residual capacities, so the type has to be
/// signed even though every stored capacity is non-negative.
pub trait Capacity:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + Zero
    + CheckedAdd
    + Debug
    + Display
    + Default
{
}

impl Capacity for i32 {}

impl Capacity for i64 {}
