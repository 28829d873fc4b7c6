//! Dense products through the shared per-type dispatchers, and mixed
//! real/complex sparse arithmetic
//!
//! The dense functions are thin wrappers over [`dense_dispatcher`]. Use a
//! [`DenseMatMulDispatcher`](crate::dispatch::DenseMatMulDispatcher)
//! directly to control the execution context or thresholds.
//!
//! Mixed real/complex operations promote the real operand to the complex
//! type and run the complex kernel, so every kernel exists once per element
//! type. Sparse operands keep their pattern through the promotion.

use crate::core::{DenseMatrix, DenseVector, Promote};
use crate::dispatch::{dense_dispatcher, DispatchFamily, DispatchResult};
use crate::sparse::{csr_matmul, merge, CsrMatrix, SparseResult};

/// `a · b`.
///
/// # Errors
///
/// `ShapeError::MatMulMismatch` if `a.cols() != b.rows()`, or a failed
/// kernel task.
pub fn matmul<T: DispatchFamily>(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> DispatchResult<DenseMatrix<T>> {
    dense_dispatcher::<T>()?.dispatch(a, b)
}

/// `a · x`.
pub fn matvec<T: DispatchFamily>(a: &DenseMatrix<T>, x: &DenseVector<T>) -> DispatchResult<DenseVector<T>> {
    dense_dispatcher::<T>()?.dispatch_vector(a, x)
}

/// `a · bᵀ` without materializing `bᵀ`.
pub fn matmul_transpose<T: DispatchFamily>(
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
) -> DispatchResult<DenseMatrix<T>> {
    dense_dispatcher::<T>()?.dispatch_transpose(a, b)
}

/// Real `a` times complex `b`.
///
/// # Examples
///
/// ```
/// use ringmat::core::num_complex::Complex;
/// use ringmat::core::DenseMatrix;
/// use ringmat::ops::matmul_real_complex;
///
/// let a = DenseMatrix::from_vec(1, 2, vec![2.0f64, 3.0]).unwrap();
/// let b = DenseMatrix::from_vec(2, 1, vec![Complex::new(0.0, 1.0), Complex::new(1.0, 0.0)]).unwrap();
///
/// let c = matmul_real_complex(&a, &b).unwrap();
/// assert_eq!(c.data(), &[Complex::new(3.0, 2.0)]);
/// ```
pub fn matmul_real_complex<R>(
    a: &DenseMatrix<R>,
    b: &DenseMatrix<R::Complex>,
) -> DispatchResult<DenseMatrix<R::Complex>>
where
    R: Promote,
    R::Complex: DispatchFamily,
{
    matmul(&a.map(|x| x.promote()), b)
}

/// Complex `a` times real `b`.
pub fn matmul_complex_real<R>(
    a: &DenseMatrix<R::Complex>,
    b: &DenseMatrix<R>,
) -> DispatchResult<DenseMatrix<R::Complex>>
where
    R: Promote,
    R::Complex: DispatchFamily,
{
    matmul(a, &b.map(|x| x.promote()))
}

macro_rules! mixed_csr_op {
    ($op:path, $real_complex:ident, $complex_real:ident, $what:literal) => {
        #[doc = concat!("Real `a` ", $what, " complex `b`.")]
        pub fn $real_complex<R: Promote>(
            a: &CsrMatrix<R>,
            b: &CsrMatrix<R::Complex>,
        ) -> SparseResult<CsrMatrix<R::Complex>> {
            $op(&a.map(|x| x.promote()), b)
        }

        #[doc = concat!("Complex `a` ", $what, " real `b`.")]
        pub fn $complex_real<R: Promote>(
            a: &CsrMatrix<R::Complex>,
            b: &CsrMatrix<R>,
        ) -> SparseResult<CsrMatrix<R::Complex>> {
            $op(a, &b.map(|x| x.promote()))
        }
    };
}

mixed_csr_op!(csr_matmul::matmul_sparse, csr_matmul_real_complex, csr_matmul_complex_real, "times");
mixed_csr_op!(merge::csr_add, csr_add_real_complex, csr_add_complex_real, "plus");
mixed_csr_op!(merge::csr_sub, csr_sub_real_complex, csr_sub_complex_real, "minus");
mixed_csr_op!(
    merge::csr_elem_mult,
    csr_elem_mult_real_complex,
    csr_elem_mult_complex_real,
    "element-wise times"
);
