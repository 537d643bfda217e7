use thiserror::Error;
use wrapconv_image::ImageError;

use crate::{kernel::KernelError, parallel::ParallelError};

/// An error type for the filter operations.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel could not be built or normalized.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// An image could not be allocated or had the wrong size.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The rows could not be scheduled.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// The iterative convolution needs at least one pass.
    #[error("Iteration count must be >= 1, got {0}")]
    InvalidIterationCount(usize),
}
