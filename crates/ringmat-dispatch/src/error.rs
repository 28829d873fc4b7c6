//! Error types for dispatched products

use ringmat_core::ShapeError;
use ringmat_exec::ExecError;
use thiserror::Error;

/// Failure of a dispatched product: either the operands do not fit
/// together or a concurrent kernel task failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
