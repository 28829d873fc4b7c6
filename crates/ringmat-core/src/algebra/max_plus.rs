use super::traits::ApproxEq;
use scirs2_core::numeric::{Float, One, Zero};
use std::fmt;
use std::ops::{Add, Mul};

/// Tropical (max, +) semiring over a float type.
///
/// | ⊕ | ⊗ | zero | one |
/// |---|---|------|-----|
/// | max | + | -∞ | 0 |
///
/// A matrix product over `MaxPlus` computes longest paths:
/// `C[i,j] = max_k(A[i,k] + B[k,j])`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct MaxPlus<T>(pub T);

impl<T: Float> MaxPlus<T> {
    /// Wrap a scalar.
    #[inline]
    pub fn new(value: T) -> Self {
        MaxPlus(value)
    }

    /// The wrapped scalar.
    #[inline]
    pub fn value(&self) -> T {
        self.0
    }
}

impl<T: Float> Add for MaxPlus<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        MaxPlus(self.0.max(rhs.0))
    }
}

impl<T: Float> Mul for MaxPlus<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        MaxPlus(self.0 + rhs.0)
    }
}

impl<T: Float> Zero for MaxPlus<T> {
    fn zero() -> Self {
        MaxPlus(T::neg_infinity())
    }

    fn is_zero(&self) -> bool {
        self.0 == T::neg_infinity()
    }
}

impl<T: Float> One for MaxPlus<T> {
    fn one() -> Self {
        MaxPlus(T::zero())
    }
}

impl<T: fmt::Display> fmt::Display for MaxPlus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Float> ApproxEq for MaxPlus<T> {
    fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        if self.0 == other.0 {
            return true;
        }
        match (self.0.to_f64(), other.0.to_f64()) {
            (Some(a), Some(b)) => a.approx_eq(&b, tol),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_absorbing_for_mul() {
        let x = MaxPlus(4.0f64);
        assert!((x * MaxPlus::zero()).is_zero());
        assert_eq!(x + MaxPlus::zero(), x);
    }

    #[test]
    fn test_longest_path_step() {
        // max(1 + 2, 5 + -1) = 4
        let row = [MaxPlus(1.0f64), MaxPlus(5.0)];
        let col = [MaxPlus(2.0f64), MaxPlus(-1.0)];
        let acc = row
            .iter()
            .zip(col.iter())
            .fold(MaxPlus::zero(), |acc, (a, b)| acc + *a * *b);
        assert_eq!(acc, MaxPlus(4.0));
    }
}
