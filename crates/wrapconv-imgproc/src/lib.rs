#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// convolution kernels module.
pub mod kernel;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;
