//! Names for every dense product kernel

use ringmat_core::Semiring;
use ringmat_kernels::{matmul, matvec, mult_transpose, DenseKernel};
use std::fmt;

/// A dense product kernel the dispatcher can select.
///
/// Caches store this tag rather than the function pointer so the choice can
/// be reported; [`MatMulAlgorithm::kernel`] resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatMulAlgorithm {
    Standard,
    Reordered,
    Blocked,
    BlockedReordered,
    ConcurrentStandard,
    ConcurrentReordered,
    ConcurrentBlocked,
    ConcurrentBlockedReordered,
    StandardVector,
    BlockedVector,
    ConcurrentStandardVector,
    ConcurrentBlockedVector,
    MultTranspose,
    MultTransposeBlocked,
    MultTransposeConcurrent,
    MultTransposeBlockedConcurrent,
}

impl MatMulAlgorithm {
    pub const ALL: [MatMulAlgorithm; 16] = [
        Self::Standard,
        Self::Reordered,
        Self::Blocked,
        Self::BlockedReordered,
        Self::ConcurrentStandard,
        Self::ConcurrentReordered,
        Self::ConcurrentBlocked,
        Self::ConcurrentBlockedReordered,
        Self::StandardVector,
        Self::BlockedVector,
        Self::ConcurrentStandardVector,
        Self::ConcurrentBlockedVector,
        Self::MultTranspose,
        Self::MultTransposeBlocked,
        Self::MultTransposeConcurrent,
        Self::MultTransposeBlockedConcurrent,
    ];

    /// The kernel this tag names, instantiated for `T`.
    pub fn kernel<T: Semiring>(self) -> DenseKernel<T> {
        match self {
            Self::Standard => matmul::standard::<T>,
            Self::Reordered => matmul::reordered::<T>,
            Self::Blocked => matmul::blocked::<T>,
            Self::BlockedReordered => matmul::blocked_reordered::<T>,
            Self::ConcurrentStandard => matmul::concurrent_standard::<T>,
            Self::ConcurrentReordered => matmul::concurrent_reordered::<T>,
            Self::ConcurrentBlocked => matmul::concurrent_blocked::<T>,
            Self::ConcurrentBlockedReordered => matmul::concurrent_blocked_reordered::<T>,
            Self::StandardVector => matvec::standard_vector::<T>,
            Self::BlockedVector => matvec::blocked_vector::<T>,
            Self::ConcurrentStandardVector => matvec::concurrent_standard_vector::<T>,
            Self::ConcurrentBlockedVector => matvec::concurrent_blocked_vector::<T>,
            Self::MultTranspose => mult_transpose::mult_transpose::<T>,
            Self::MultTransposeBlocked => mult_transpose::mult_transpose_blocked::<T>,
            Self::MultTransposeConcurrent => mult_transpose::mult_transpose_concurrent::<T>,
            Self::MultTransposeBlockedConcurrent => {
                mult_transpose::mult_transpose_blocked_concurrent::<T>
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Reordered => "reordered",
            Self::Blocked => "blocked",
            Self::BlockedReordered => "blocked_reordered",
            Self::ConcurrentStandard => "concurrent_standard",
            Self::ConcurrentReordered => "concurrent_reordered",
            Self::ConcurrentBlocked => "concurrent_blocked",
            Self::ConcurrentBlockedReordered => "concurrent_blocked_reordered",
            Self::StandardVector => "standard_vector",
            Self::BlockedVector => "blocked_vector",
            Self::ConcurrentStandardVector => "concurrent_standard_vector",
            Self::ConcurrentBlockedVector => "concurrent_blocked_vector",
            Self::MultTranspose => "mult_transpose",
            Self::MultTransposeBlocked => "mult_transpose_blocked",
            Self::MultTransposeConcurrent => "mult_transpose_concurrent",
            Self::MultTransposeBlockedConcurrent => "mult_transpose_blocked_concurrent",
        }
    }

    /// Whether the kernel submits work to the pool.
    pub fn is_concurrent(self) -> bool {
        matches!(
            self,
            Self::ConcurrentStandard
                | Self::ConcurrentReordered
                | Self::ConcurrentBlocked
                | Self::ConcurrentBlockedReordered
                | Self::ConcurrentStandardVector
                | Self::ConcurrentBlockedVector
                | Self::MultTransposeConcurrent
                | Self::MultTransposeBlockedConcurrent
        )
    }

    /// Whether the kernel computes `A·x` for a single column.
    pub fn is_vector(self) -> bool {
        matches!(
            self,
            Self::StandardVector
                | Self::BlockedVector
                | Self::ConcurrentStandardVector
                | Self::ConcurrentBlockedVector
        )
    }

    /// Whether the kernel computes `A·Bᵀ`.
    pub fn is_transpose(self) -> bool {
        matches!(
            self,
            Self::MultTranspose
                | Self::MultTransposeBlocked
                | Self::MultTransposeConcurrent
                | Self::MultTransposeBlockedConcurrent
        )
    }
}

impl fmt::Display for MatMulAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
