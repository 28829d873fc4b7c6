//! Property-based tests for element algebras and shapes
//!
//! Checks the semiring and field laws the kernels rely on, and the
//! structural behavior of shapes as hash keys.

use proptest::prelude::*;
use ringmat_core::numeric::{One, Zero};
use ringmat_core::{BoolSemiring, DenseMatrix, MaxPlus, Shape, Zmod};
use std::collections::HashSet;

type F97 = Zmod<97>;

// ============================================================================
// Zmod field laws
// ============================================================================

proptest! {
    /// Property: addition and multiplication are commutative and associative
    #[test]
    fn prop_zmod_commutative_associative(a in 0u64..97, b in 0u64..97, c in 0u64..97) {
        let (a, b, c) = (F97::new(a), F97::new(b), F97::new(c));
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!(a * b, b * a);
        prop_assert_eq!((a + b) + c, a + (b + c));
        prop_assert_eq!((a * b) * c, a * (b * c));
    }

    /// Property: multiplication distributes over addition
    #[test]
    fn prop_zmod_distributive(a in 0u64..97, b in 0u64..97, c in 0u64..97) {
        let (a, b, c) = (F97::new(a), F97::new(b), F97::new(c));
        prop_assert_eq!(a * (b + c), a * b + a * c);
    }

    /// Property: division undoes multiplication by a non-zero element
    #[test]
    fn prop_zmod_division(a in 0u64..97, b in 1u64..97) {
        let (a, b) = (F97::new(a), F97::new(b));
        prop_assert_eq!((a * b) / b, a);
        prop_assert_eq!(a - a, F97::zero());
    }
}

// ============================================================================
// Tropical and boolean semiring laws
// ============================================================================

proptest! {
    /// Property: (max, +) distributes
    #[test]
    fn prop_max_plus_distributive(a in -1e3..1e3f64, b in -1e3..1e3f64, c in -1e3..1e3f64) {
        let (a, b, c) = (MaxPlus(a), MaxPlus(b), MaxPlus(c));
        prop_assert_eq!(a * (b + c), a * b + a * c);
        prop_assert_eq!(a * MaxPlus::one(), a);
    }

    /// Property: boolean semiring identities
    #[test]
    fn prop_bool_identities(a: bool, b: bool) {
        let (a, b) = (BoolSemiring(a), BoolSemiring(b));
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!(a * BoolSemiring::one(), a);
        prop_assert_eq!(a + BoolSemiring::zero(), a);
    }
}

// ============================================================================
// Shape and dense container properties
// ============================================================================

proptest! {
    /// Property: independently built shapes collide as hash keys
    #[test]
    fn prop_shape_structural_key(r in 0usize..50, c in 0usize..50) {
        let mut set = HashSet::new();
        set.insert(Shape::matrix(r, c));
        prop_assert!(set.contains(&Shape::new(&[r, c]).unwrap()));
    }

    /// Property: transposing twice is the identity
    #[test]
    fn prop_transpose_involution(r in 1usize..8, c in 1usize..8, seed in 0i64..1000) {
        let data: Vec<i64> = (0..(r * c) as i64).map(|x| x * 31 + seed).collect();
        let m = DenseMatrix::from_vec(r, c, data).unwrap();
        prop_assert_eq!(m.transpose().transpose(), m);
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_shape_serde_roundtrip() {
    let s = Shape::matrix(3, 7);
    let json = serde_json::to_string(&s).unwrap();
    let back: Shape = serde_json::from_str(&json).unwrap();
    assert_eq!(s, back);
}
