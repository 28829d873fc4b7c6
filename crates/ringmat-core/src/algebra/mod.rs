//! Algebraic element types.
//!
//! Every kernel in ringmat is written once against the traits in this module
//! and works for any element type that provides the required operations:
//!
//! | Trait | Operations | Examples |
//! |-------|------------|----------|
//! | [`Semiring`] | `+`, `×`, zero, one | `u64`, [`BoolSemiring`], [`MaxPlus`] |
//! | [`Ring`] | semiring plus `-` and negation | `i64`, `f64` |
//! | [`Field`] | ring plus `/` and conjugation | `f64`, `Complex<f64>`, [`Zmod`] |
//!
//! [`Semiring`] and [`Ring`] have blanket implementations, so any type with
//! the right operator impls qualifies automatically. [`Field`] is implemented
//! explicitly because conjugation has no operator trait.
//!
//! # Example
//!
//! ```
//! use ringmat_core::algebra::{MaxPlus, Semiring};
//! use ringmat_core::numeric::{One, Zero};
//!
//! let a = MaxPlus(3.0f64);
//! let b = MaxPlus(5.0f64);
//!
//! // (max, +): addition picks the larger, multiplication adds
//! assert_eq!(a + b, MaxPlus(5.0));
//! assert_eq!(a * b, MaxPlus(8.0));
//! assert_eq!(MaxPlus::<f64>::zero() + a, a);
//! assert_eq!(MaxPlus::<f64>::one() * a, a);
//! ```

mod bool_semiring;
mod max_plus;
mod promote;
mod traits;
mod zmod;

pub use bool_semiring::BoolSemiring;
pub use max_plus::MaxPlus;
pub use promote::{promote_slice, Promote};
pub use traits::{ApproxEq, Field, Ring, Semiring};
pub use zmod::Zmod;
