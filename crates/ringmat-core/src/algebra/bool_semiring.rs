use super::traits::ApproxEq;
use scirs2_core::numeric::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul};

/// Boolean (OR, AND) semiring.
///
/// A matrix product over this semiring answers reachability: `C[i,j]` is
/// true iff some `k` has both `A[i,k]` and `B[k,j]`.
///
/// # Examples
///
/// ```
/// use ringmat_core::algebra::BoolSemiring;
///
/// let t = BoolSemiring(true);
/// let f = BoolSemiring(false);
///
/// assert_eq!(t + f, t);
/// assert_eq!(t * f, f);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct BoolSemiring(pub bool);

impl Add for BoolSemiring {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        BoolSemiring(self.0 || rhs.0)
    }
}

impl Mul for BoolSemiring {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        BoolSemiring(self.0 && rhs.0)
    }
}

impl Zero for BoolSemiring {
    fn zero() -> Self {
        BoolSemiring(false)
    }

    fn is_zero(&self) -> bool {
        !self.0
    }
}

impl One for BoolSemiring {
    fn one() -> Self {
        BoolSemiring(true)
    }
}

impl From<bool> for BoolSemiring {
    fn from(b: bool) -> Self {
        BoolSemiring(b)
    }
}

impl fmt::Display for BoolSemiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.0 { 1 } else { 0 })
    }
}

impl ApproxEq for BoolSemiring {
    fn approx_eq(&self, other: &Self, _tol: f64) -> bool {
        self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        for v in [false, true] {
            let x = BoolSemiring(v);
            assert_eq!(x + BoolSemiring::zero(), x);
            assert_eq!(x * BoolSemiring::one(), x);
            assert_eq!(x * BoolSemiring::zero(), BoolSemiring::zero());
        }
    }
}
