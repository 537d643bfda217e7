use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0 and divide the buffer length, got {0}")]
    InvalidRowStride(usize),
}

/// Controls how the rows of an output image are computed.
///
/// Every strategy produces the same result, rows never depend on each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

/// Fill the rows of a buffer, handing each row index and its mutable slice to `op`.
///
/// # Arguments
///
/// * `dst` - The row-major buffer to fill.
/// * `row_stride` - Number of elements in one row (width * channels).
/// * `strategy` - The execution strategy.
/// * `op` - The operation computing one output row.
///
/// # Errors
///
/// * [`ParallelError::InvalidRowStride`] if the stride is zero or does not divide the buffer.
/// * [`ParallelError::InvalidThreadCount`] for `Fixed(0)`.
pub fn for_each_row<T, F>(
    dst: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if dst.is_empty() {
        return Ok(());
    }

    if row_stride == 0 || dst.len() % row_stride != 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, dst_row)| op(row, dst_row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, dst_row)| op(row, dst_row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(|(row, dst_row)| op(row, dst_row));
            });
        }
    }
    Ok(())
}
