//! Semiring, ring and field traits.

use scirs2_core::num_complex::Complex;
use scirs2_core::numeric::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A set with an associative, commutative addition (identity [`Zero`]) and an
/// associative multiplication (identity [`One`]) that distributes over it.
///
/// This is the minimum a matrix product needs:
///
/// ```text
/// C[i,j] = Σ_k A[i,k] · B[k,j]
/// ```
///
/// Implemented automatically for every type with the listed bounds.
pub trait Semiring:
    Clone + Send + Sync + Debug + PartialEq + Zero + One + Add<Output = Self> + Mul<Output = Self>
{
}

impl<T> Semiring for T where
    T: Clone
        + Send
        + Sync
        + Debug
        + PartialEq
        + Zero
        + One
        + Add<Output = T>
        + Mul<Output = T>
{
}

/// A semiring with additive inverses.
pub trait Ring: Semiring + Sub<Output = Self> + Neg<Output = Self> {}

impl<T> Ring for T where T: Semiring + Sub<Output = T> + Neg<Output = T> {}

/// A ring with multiplicative inverses for every non-zero element.
///
/// Fields also carry a conjugation, the identity for real and finite fields,
/// used by Hermitian transposes.
pub trait Field: Ring + Div<Output = Self> {
    /// Complex conjugate; the identity for non-complex fields.
    fn conj(&self) -> Self;
}

impl Field for f32 {
    #[inline]
    fn conj(&self) -> Self {
        *self
    }
}

impl Field for f64 {
    #[inline]
    fn conj(&self) -> Self {
        *self
    }
}

impl Field for Complex<f32> {
    #[inline]
    fn conj(&self) -> Self {
        Complex::conj(self)
    }
}

impl Field for Complex<f64> {
    #[inline]
    fn conj(&self) -> Self {
        Complex::conj(self)
    }
}

/// Approximate equality used when comparing results of different kernels.
///
/// Exact element types compare with `==` and ignore the tolerance. Floating
/// point types use a mixed absolute/relative bound:
/// `|a - b| <= tol * max(1, |a|, |b|)`.
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self, tol: f64) -> bool;
}

#[inline]
fn close(a: f64, b: f64, tol: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = 1.0f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= tol * scale
}

impl ApproxEq for f32 {
    fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        close(*self as f64, *other as f64, tol)
    }
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        close(*self, *other, tol)
    }
}

impl ApproxEq for Complex<f32> {
    fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        close(self.re as f64, other.re as f64, tol) && close(self.im as f64, other.im as f64, tol)
    }
}

impl ApproxEq for Complex<f64> {
    fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        close(self.re, other.re, tol) && close(self.im, other.im, tol)
    }
}

macro_rules! exact_approx_eq {
    ($($t:ty),*) => {
        $(
            impl ApproxEq for $t {
                #[inline]
                fn approx_eq(&self, other: &Self, _tol: f64) -> bool {
                    self == other
                }
            }
        )*
    };
}

exact_approx_eq!(i32, i64, u32, u64, usize);
