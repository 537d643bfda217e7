use thiserror::Error;

/// An error type for kernel construction and normalization.
#[derive(Error, Debug, PartialEq)]
pub enum KernelError {
    /// The weight matrix is empty, has an even dimension or ragged rows.
    #[error("Invalid kernel shape: {0}")]
    InvalidKernelShape(String),

    /// A kernel generator received an out of range parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A weight is NaN or infinite.
    #[error("Non finite kernel weight at row {0}, col {1}")]
    NonFiniteValue(usize, usize),

    /// The weights sum to zero (or a non finite value) so they cannot be normalized.
    #[error("Cannot normalize a kernel whose weights sum to {0}")]
    DegenerateKernel(f64),
}
