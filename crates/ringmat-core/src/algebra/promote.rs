use super::traits::Field;
use scirs2_core::num_complex::Complex;

/// Lift a real element into its complex counterpart.
///
/// Mixed real/complex products promote the real operand and then run the
/// complex kernel, so no kernel is duplicated per type combination.
pub trait Promote: Copy {
    type Complex: Field + Copy;

    fn promote(self) -> Self::Complex;
}

impl Promote for f32 {
    type Complex = Complex<f32>;

    #[inline]
    fn promote(self) -> Complex<f32> {
        Complex::new(self, 0.0)
    }
}

impl Promote for f64 {
    type Complex = Complex<f64>;

    #[inline]
    fn promote(self) -> Complex<f64> {
        Complex::new(self, 0.0)
    }
}

/// Promote every element of a slice.
pub fn promote_slice<T: Promote>(data: &[T]) -> Vec<T::Complex> {
    data.iter().map(|&x| x.promote()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_slice() {
        let z = promote_slice(&[1.0f64, -2.5]);
        assert_eq!(z, vec![Complex::new(1.0, 0.0), Complex::new(-2.5, 0.0)]);
    }
}
