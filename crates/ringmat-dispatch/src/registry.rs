//! Process-wide dispatchers, one per element type
//!
//! Each element type maps to a threshold preset through [`DispatchFamily`].
//! The first call to [`dense_dispatcher`] for a type builds its dispatcher
//! on the global execution context; later calls share it, and so share its
//! shape cache.

use crate::dense::DenseMatMulDispatcher;
use crate::error::DispatchResult;
use crate::thresholds::DispatchThresholds;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use ringmat_core::num_complex::Complex;
use ringmat_core::{BoolSemiring, MaxPlus, Semiring, Zmod};
use ringmat_exec::ExecContext;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Element types with a process-wide dense dispatcher.
pub trait DispatchFamily: Semiring + 'static {
    /// Threshold preset used when the dispatcher is first built.
    fn thresholds() -> DispatchThresholds;
}

macro_rules! dispatch_family {
    ($preset:ident: $($t:ty),+ $(,)?) => {
        $(
            impl DispatchFamily for $t {
                fn thresholds() -> DispatchThresholds {
                    DispatchThresholds::$preset()
                }
            }
        )+
    };
}

dispatch_family!(real: f32, f64);
dispatch_family!(complex: Complex<f32>, Complex<f64>);
dispatch_family!(semiring: MaxPlus<f32>, MaxPlus<f64>, BoolSemiring, i32, i64);

impl<const P: u64> DispatchFamily for Zmod<P> {
    fn thresholds() -> DispatchThresholds {
        DispatchThresholds::field()
    }
}

type Registry = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

static DISPATCHERS: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Shared dispatcher for `T`.
///
/// The dispatcher snapshots the global block size and pool when it is built.
/// Call [`reset_dispatchers`] after changing the global configuration to pick
/// up the new values.
///
/// # Errors
///
/// Fails only if the global pool cannot be built.
pub fn dense_dispatcher<T: DispatchFamily>() -> DispatchResult<Arc<DenseMatMulDispatcher<T>>> {
    let mut registry = DISPATCHERS.lock();
    if let Some(existing) = registry
        .get(&TypeId::of::<T>())
        .and_then(|entry| entry.downcast_ref::<Arc<DenseMatMulDispatcher<T>>>())
    {
        return Ok(Arc::clone(existing));
    }

    let ctx = ExecContext::global()?;
    log::debug!(
        "building dense dispatcher for {} (parallelism {}, block size {})",
        std::any::type_name::<T>(),
        ctx.parallelism(),
        ctx.block_size()
    );
    let dispatcher = Arc::new(DenseMatMulDispatcher::new(ctx, T::thresholds()));
    registry.insert(TypeId::of::<T>(), Box::new(Arc::clone(&dispatcher)));
    Ok(dispatcher)
}

/// Drop every shared dispatcher; the next call to [`dense_dispatcher`]
/// builds a fresh one with an empty cache.
pub fn reset_dispatchers() {
    DISPATCHERS.lock().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_type_shares_dispatcher() {
        let a = dense_dispatcher::<i32>().unwrap();
        let b = dense_dispatcher::<i32>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_presets_by_family() {
        assert_eq!(
            dense_dispatcher::<Complex<f32>>().unwrap().thresholds(),
            &DispatchThresholds::complex()
        );
        assert_eq!(
            dense_dispatcher::<Zmod<7>>().unwrap().thresholds(),
            &DispatchThresholds::field()
        );
        assert_eq!(
            dense_dispatcher::<BoolSemiring>().unwrap().thresholds(),
            &DispatchThresholds::semiring()
        );
    }
}
