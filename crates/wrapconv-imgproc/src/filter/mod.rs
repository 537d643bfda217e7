//! Filter operations
//!
//! This module convolves images with dense [`crate::kernel::Kernel`]s using wrap-around
//! border handling. A single pass accumulates into `f32` samples; the iterative path keeps
//! every intermediate pass in `f32` and narrows to the input sample type only once.

mod border;
pub use border::*;

mod convolution;
pub use convolution::*;

mod error;
pub use error::FilterError;

/// Filter operations
mod ops;
pub use ops::*;
