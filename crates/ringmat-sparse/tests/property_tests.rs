//! Property-based tests for sparse formats and merge-join arithmetic
//!
//! Sparse results are compared against the same operation on dense copies.
//! Integer entries keep every comparison exact.

use proptest::collection::{btree_map, vec as pvec};
use proptest::prelude::*;
use ringmat_core::{DenseMatrix, DenseVector};
use ringmat_exec::ExecContext;
use ringmat_sparse::{coo_matmul, csr_matmul, merge, CooMatrix, CooTriplets, CooVector, CsrMatrix};

fn sparse_vector(size: usize) -> impl Strategy<Value = CooVector<i64>> {
    btree_map(0..size, -50i64..50, 0..=size).prop_map(move |entries| {
        let (indices, values) = entries.into_iter().unzip();
        CooVector::new(size, indices, values).unwrap()
    })
}

fn vector_pair() -> impl Strategy<Value = (CooVector<i64>, CooVector<i64>)> {
    (1usize..40).prop_flat_map(|n| (sparse_vector(n), sparse_vector(n)))
}

fn sparse_matrix(rows: usize, cols: usize) -> impl Strategy<Value = CooMatrix<i64>> {
    btree_map((0..rows, 0..cols), -20i64..20, 0..=(rows * cols).min(30)).prop_map(move |entries| {
        let mut t = CooTriplets::new(rows, cols);
        for ((r, c), v) in entries {
            t.push(r, c, v).unwrap();
        }
        t.into_sorted()
    })
}

fn matrix_pair() -> impl Strategy<Value = (CooMatrix<i64>, CooMatrix<i64>)> {
    (1usize..9, 1usize..9).prop_flat_map(|(m, n)| (sparse_matrix(m, n), sparse_matrix(m, n)))
}

fn product_pair() -> impl Strategy<Value = (CooMatrix<i64>, CooMatrix<i64>)> {
    (1usize..9, 1usize..9, 1usize..9)
        .prop_flat_map(|(m, n, k)| (sparse_matrix(m, n), sparse_matrix(n, k)))
}

fn mixed_pair() -> impl Strategy<Value = (CooMatrix<i64>, DenseMatrix<i64>)> {
    (1usize..9, 1usize..9).prop_flat_map(|(m, n)| {
        let dense = pvec(-20i64..20, m * n).prop_map(move |d| DenseMatrix::from_vec(m, n, d).unwrap());
        (sparse_matrix(m, n), dense)
    })
}

fn mixed_vector_pair() -> impl Strategy<Value = (CooVector<i64>, DenseVector<i64>)> {
    (1usize..40).prop_flat_map(|n| (sparse_vector(n), pvec(-50i64..50, n).prop_map(DenseVector::from_vec)))
}

fn zip_dense(a: &[i64], b: &[i64], op: impl Fn(i64, i64) -> i64) -> Vec<i64> {
    a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect()
}

fn dense_add(a: &DenseMatrix<i64>, b: &DenseMatrix<i64>) -> Vec<i64> {
    a.data().iter().zip(b.data()).map(|(x, y)| x + y).collect()
}

fn dense_matmul(a: &DenseMatrix<i64>, b: &DenseMatrix<i64>) -> Vec<i64> {
    let (m, n, k) = (a.rows(), a.cols(), b.cols());
    let mut out = vec![0; m * k];
    for i in 0..m {
        for j in 0..k {
            out[i * k + j] = (0..n).map(|p| a.data()[i * n + p] * b.data()[p * k + j]).sum();
        }
    }
    out
}

fn strictly_increasing(v: &[usize]) -> bool {
    v.windows(2).all(|w| w[0] < w[1])
}

// ============================================================================
// Vector merge-joins
// ============================================================================

proptest! {
    /// Property: add output is sorted, commutative and agrees with dense add
    #[test]
    fn prop_vector_add((a, b) in vector_pair()) {
        let ab = merge::vec_add(&a, &b).unwrap();
        let ba = merge::vec_add(&b, &a).unwrap();
        prop_assert!(strictly_increasing(ab.indices()));
        prop_assert_eq!(&ab, &ba);

        let expected: Vec<i64> = a
            .to_dense()
            .data()
            .iter()
            .zip(b.to_dense().data())
            .map(|(x, y)| x + y)
            .collect();
        let lhs = ab.to_dense();
        prop_assert_eq!(lhs.data(), &expected[..]);
    }

    /// Property: a - b == a + (-b), entry for entry
    #[test]
    fn prop_vector_sub_is_add_negated((a, b) in vector_pair()) {
        let sub = merge::vec_sub(&a, &b).unwrap();
        let add_neg = merge::vec_add(&a, &merge::vec_negate(&b)).unwrap();
        prop_assert_eq!(sub, add_neg);
    }

    /// Property: elem_mult keeps exactly the shared indices; dot sums them
    #[test]
    fn prop_vector_intersection((a, b) in vector_pair()) {
        let p = merge::vec_elem_mult(&a, &b).unwrap();
        prop_assert!(strictly_increasing(p.indices()));
        prop_assert!(p.indices().iter().all(|i| a.indices().contains(i) && b.indices().contains(i)));
        prop_assert_eq!(&p, &merge::vec_elem_mult(&b, &a).unwrap());

        let dot = merge::vec_dot(&a, &b).unwrap();
        prop_assert_eq!(dot, p.values().iter().sum::<i64>());
    }
}

// ============================================================================
// Matrix merge-joins
// ============================================================================

proptest! {
    /// Property: COO and CSR add agree with dense add and with each other
    #[test]
    fn prop_matrix_add((a, b) in matrix_pair()) {
        let expected = dense_add(&a.to_dense().unwrap(), &b.to_dense().unwrap());

        let coo = merge::coo_add(&a, &b).unwrap();
        let lhs = coo.to_dense().unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        prop_assert_eq!(&coo, &merge::coo_add(&b, &a).unwrap());

        let csr = merge::csr_add(&a.to_csr(), &b.to_csr()).unwrap();
        prop_assert_eq!(&csr, &coo.to_csr());
        for r in 0..csr.rows() {
            prop_assert!(strictly_increasing(csr.row(r).0));
        }
    }

    /// Property: CSR and COO subtraction negate only the second operand
    #[test]
    fn prop_matrix_sub_is_add_negated((a, b) in matrix_pair()) {
        let coo_sub = merge::coo_sub(&a, &b).unwrap();
        prop_assert_eq!(&coo_sub, &merge::coo_add(&a, &merge::coo_negate(&b)).unwrap());

        let csr_sub = merge::csr_sub(&a.to_csr(), &b.to_csr()).unwrap();
        prop_assert_eq!(&csr_sub, &coo_sub.to_csr());
    }

    /// Property: element-wise products agree between formats
    #[test]
    fn prop_matrix_elem_mult((a, b) in matrix_pair()) {
        let coo = merge::coo_elem_mult(&a, &b).unwrap();
        let csr = merge::csr_elem_mult(&a.to_csr(), &b.to_csr()).unwrap();
        prop_assert_eq!(csr, coo.to_csr());
    }
}

// ============================================================================
// Mixed sparse/dense
// ============================================================================

proptest! {
    /// Property: sparse ± dense agrees with the all-dense computation in both formats
    #[test]
    fn prop_mixed_matrix_add_sub((a, b) in mixed_pair()) {
        let da = a.to_dense().unwrap();
        let csr = a.to_csr();
        let sum = zip_dense(da.data(), b.data(), |x, y| x + y);
        let diff = zip_dense(da.data(), b.data(), |x, y| x - y);
        let rdiff = zip_dense(b.data(), da.data(), |x, y| x - y);

        let lhs = merge::csr_dense_add(&csr, &b).unwrap();
        prop_assert_eq!(lhs.data(), &sum[..]);
        let lhs = merge::coo_dense_add(&a, &b).unwrap();
        prop_assert_eq!(lhs.data(), &sum[..]);
        let lhs = merge::csr_dense_sub(&csr, &b).unwrap();
        prop_assert_eq!(lhs.data(), &diff[..]);
        let lhs = merge::coo_dense_sub(&a, &b).unwrap();
        prop_assert_eq!(lhs.data(), &diff[..]);
        let lhs = merge::dense_csr_sub(&b, &csr).unwrap();
        prop_assert_eq!(lhs.data(), &rdiff[..]);
        let lhs = merge::dense_coo_sub(&b, &a).unwrap();
        prop_assert_eq!(lhs.data(), &rdiff[..]);
    }

    /// Property: sparse ⊙ dense keeps the sparse pattern and matches the dense product
    #[test]
    fn prop_mixed_matrix_elem_mult((a, b) in mixed_pair()) {
        let expected = zip_dense(a.to_dense().unwrap().data(), b.data(), |x, y| x * y);

        let coo = merge::coo_dense_elem_mult(&a, &b).unwrap();
        prop_assert_eq!(coo.row_indices(), a.row_indices());
        prop_assert_eq!(coo.col_indices(), a.col_indices());
        let lhs = coo.to_dense().unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);

        let csr = merge::csr_dense_elem_mult(&a.to_csr(), &b).unwrap();
        prop_assert_eq!(csr, coo.to_csr());
    }

    /// Property: vector variants agree with the dense reference
    #[test]
    fn prop_mixed_vector_ops((a, b) in mixed_vector_pair()) {
        let da = a.to_dense();

        let lhs = merge::vec_dense_add(&a, &b).unwrap();
        prop_assert_eq!(
            lhs.data(),
            &zip_dense(da.data(), b.data(), |x, y| x + y)[..]
        );
        let lhs = merge::vec_dense_sub(&a, &b).unwrap();
        prop_assert_eq!(
            lhs.data(),
            &zip_dense(da.data(), b.data(), |x, y| x - y)[..]
        );
        let lhs = merge::dense_vec_sub(&b, &a).unwrap();
        prop_assert_eq!(
            lhs.data(),
            &zip_dense(b.data(), da.data(), |x, y| x - y)[..]
        );

        let p = merge::vec_dense_elem_mult(&a, &b).unwrap();
        prop_assert_eq!(p.indices(), a.indices());
        let lhs = p.to_dense();
        prop_assert_eq!(
            lhs.data(),
            &zip_dense(da.data(), b.data(), |x, y| x * y)[..]
        );
    }
}

// ============================================================================
// Layout transformations
// ============================================================================

proptest! {
    /// Property: transpose matches the dense transpose and is an involution
    #[test]
    fn prop_transpose((a, _) in matrix_pair()) {
        let csr = a.to_csr();
        let t = csr.transpose();
        prop_assert_eq!(t.to_dense().unwrap(), csr.to_dense().unwrap().transpose());
        prop_assert_eq!(&t.transpose(), &csr);
        prop_assert_eq!(a.transpose().to_csr(), t);
    }

    /// Property: swapping twice restores the matrix
    #[test]
    fn prop_swaps_are_involutions((a, _) in matrix_pair(), i in 0usize..9, j in 0usize..9) {
        let original = a.to_csr();
        let (i, j) = (i % original.rows(), j % original.rows());
        let mut csr = original.clone();
        csr.swap_rows(i, j).unwrap();
        csr.swap_rows(i, j).unwrap();
        prop_assert_eq!(&csr, &original);

        let (ci, cj) = (i % original.cols(), j % original.cols());
        csr.swap_cols(ci, cj).unwrap();
        csr.swap_cols(ci, cj).unwrap();
        prop_assert_eq!(&csr, &original);
    }
}

// ============================================================================
// Products
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every sparse product agrees with the dense reference
    #[test]
    fn prop_products_match_dense((a, b) in product_pair(), workers in 1usize..5) {
        let ctx = ExecContext::with_parallelism(workers, 2).unwrap();
        let (da, db) = (a.to_dense().unwrap(), b.to_dense().unwrap());
        let expected = dense_matmul(&da, &db);
        let (ca, cb) = (a.to_csr(), b.to_csr());

        let lhs = csr_matmul::matmul_dense(&ca, &cb).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        let lhs = csr_matmul::concurrent_matmul_dense(&ctx, &ca, &cb).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);

        let sparse = csr_matmul::matmul_sparse(&ca, &cb).unwrap();
        let lhs = sparse.to_dense().unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        prop_assert_eq!(&csr_matmul::concurrent_matmul_sparse(&ctx, &ca, &cb).unwrap(), &sparse);

        let lhs = csr_matmul::csr_dense_matmul(&ca, &db).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        let lhs = csr_matmul::dense_csr_matmul(&da, &cb).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        let lhs = coo_matmul::concurrent_coo_dense_matmul(&ctx, &a, &db).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        let lhs = coo_matmul::concurrent_dense_coo_matmul(&ctx, &da, &b).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
    }
}

// ============================================================================
// Fixed scenarios
// ============================================================================

#[test]
fn test_single_entry_csr_product() {
    let a = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![2.0]).unwrap();
    let b = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![3.0]).unwrap();

    let dense = csr_matmul::matmul_dense(&a, &b).unwrap();
    assert_eq!(dense, DenseMatrix::from_vec(2, 2, vec![6.0, 0.0, 0.0, 0.0]).unwrap());

    let sparse = csr_matmul::matmul_sparse(&a, &b).unwrap();
    assert_eq!(sparse.row_ptr(), &[0, 1, 1]);
    assert_eq!(sparse.col_indices(), &[0]);
    assert_eq!(sparse.values(), &[6.0]);
}

#[test]
fn test_diagonal_matvec() {
    let ctx = ExecContext::with_parallelism(2, 4).unwrap();
    let a = CooMatrix::new(3, 3, vec![0, 1, 2], vec![0, 1, 2], vec![1i64, 2, 3]).unwrap();
    let x = DenseVector::from_vec(vec![4, 5, 6]);
    let y = csr_matmul::concurrent_matvec(&ctx, &a.to_csr(), &x).unwrap();
    assert_eq!(y.data(), &[4, 10, 18]);
    assert_eq!(coo_matmul::coo_dense_matvec(&a, &x).unwrap(), y);
}

proptest! {
    /// Property: sparse matvec variants agree with the dense reference
    #[test]
    fn prop_matvec_matches_dense(
        (a, x) in (1usize..9, 1usize..9).prop_flat_map(|(m, n)| (sparse_matrix(m, n), pvec(-9i64..9, n))),
    ) {
        let ctx = ExecContext::with_parallelism(3, 1).unwrap();
        let da = a.to_dense().unwrap();
        let n = a.cols();
        let expected: Vec<i64> = (0..a.rows())
            .map(|i| (0..n).map(|j| da.data()[i * n + j] * x[j]).sum())
            .collect();

        let dx = DenseVector::from_vec(x.clone());
        let csr = a.to_csr();
        let lhs = csr_matmul::matvec(&csr, &dx).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        let lhs = csr_matmul::concurrent_matvec(&ctx, &csr, &dx).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        let lhs = coo_matmul::coo_dense_matvec(&a, &dx).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);

        let sx = CooVector::from_dense(&x);
        let lhs = csr_matmul::matvec_sparse_vector(&csr, &sx).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
        let lhs = coo_matmul::dense_coo_matvec(&da, &sx).unwrap();
        prop_assert_eq!(lhs.data(), &expected[..]);
    }
}
