use super::traits::{ApproxEq, Field};
use scirs2_core::numeric::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Integers modulo a prime `P`.
///
/// An exact finite field, useful for checking kernels against each other
/// without floating point tolerance. `P` must be prime for division to be
/// well defined; addition, subtraction and multiplication work for any
/// modulus greater than one.
///
/// # Examples
///
/// ```
/// use ringmat_core::algebra::Zmod;
///
/// type F7 = Zmod<7>;
///
/// let a = F7::new(5);
/// let b = F7::new(4);
///
/// assert_eq!(a + b, F7::new(2));
/// assert_eq!(a * b, F7::new(6));
/// assert_eq!((a / b) * b, a);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Zmod<const P: u64>(u64);

impl<const P: u64> Zmod<P> {
    /// Reduce `value` modulo `P`.
    #[inline]
    pub fn new(value: u64) -> Self {
        Zmod(value % P)
    }

    /// Reduce a signed value, mapping negatives into `[0, P)`.
    pub fn from_i64(value: i64) -> Self {
        let r = (value as i128).rem_euclid(P as i128);
        Zmod(r as u64)
    }

    /// Canonical representative in `[0, P)`.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The modulus.
    #[inline]
    pub const fn modulus() -> u64 {
        P
    }

    /// `self^exp` by repeated squaring.
    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut acc = Self::one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            exp >>= 1;
        }
        acc
    }

    /// Multiplicative inverse, or `None` for zero.
    pub fn checked_inv(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else {
            // Fermat: a^(P-2) = a^-1 for prime P
            Some(self.pow(P - 2))
        }
    }
}

impl<const P: u64> Add for Zmod<P> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Zmod(((self.0 as u128 + rhs.0 as u128) % P as u128) as u64)
    }
}

impl<const P: u64> Sub for Zmod<P> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<const P: u64> Neg for Zmod<P> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        if self.0 == 0 {
            self
        } else {
            Zmod(P - self.0)
        }
    }
}

impl<const P: u64> Mul for Zmod<P> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Zmod(((self.0 as u128 * rhs.0 as u128) % P as u128) as u64)
    }
}

impl<const P: u64> Div for Zmod<P> {
    type Output = Self;

    /// # Panics
    ///
    /// Panics on division by zero, like integer division.
    fn div(self, rhs: Self) -> Self {
        match rhs.checked_inv() {
            Some(inv) => self * inv,
            None => panic!("division by zero in Z/{}", P),
        }
    }
}

impl<const P: u64> Zero for Zmod<P> {
    fn zero() -> Self {
        Zmod(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl<const P: u64> One for Zmod<P> {
    fn one() -> Self {
        Zmod(1 % P)
    }
}

impl<const P: u64> Field for Zmod<P> {
    #[inline]
    fn conj(&self) -> Self {
        *self
    }
}

impl<const P: u64> ApproxEq for Zmod<P> {
    fn approx_eq(&self, other: &Self, _tol: f64) -> bool {
        self == other
    }
}

impl<const P: u64> From<u64> for Zmod<P> {
    fn from(v: u64) -> Self {
        Zmod::new(v)
    }
}

impl<const P: u64> fmt::Display for Zmod<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
