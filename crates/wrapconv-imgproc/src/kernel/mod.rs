//! Convolution kernels
//!
//! A [`Kernel`] is a dense matrix of real weights with odd dimensions. Rows and weights
//! are addressed relative to the kernel center, so a 3x5 kernel is indexed with row
//! offsets in `-1..=1` and column offsets in `-2..=2`.

mod error;
pub use error::KernelError;

mod gaussian;
pub use gaussian::{gaussian_kernel_2d, gaussian_pdf};

use std::ops::Index;

/// A dense 2D matrix of convolution weights with odd dimensions.
///
/// The weights are owned by the kernel and stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a kernel from a matrix of rows.
    ///
    /// # Arguments
    ///
    /// * `rows` - The weights, one vector per kernel row.
    ///
    /// # Errors
    ///
    /// * [`KernelError::InvalidKernelShape`] if the matrix is empty, has an even dimension
    ///   or rows of different length.
    /// * [`KernelError::NonFiniteValue`] if a weight is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapconv_imgproc::kernel::Kernel;
    ///
    /// let kernel = Kernel::new(vec![
    ///     vec![0.0, -1.0, 0.0],
    ///     vec![-1.0, 5.0, -1.0],
    ///     vec![0.0, -1.0, 0.0],
    /// ]).unwrap();
    ///
    /// assert_eq!(kernel.height(), 3);
    /// assert_eq!(kernel[0], [-1.0, 5.0, -1.0]);
    /// ```
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, KernelError> {
        Self::from_rows(&rows)
    }

    /// Create a kernel by copying borrowed rows.
    ///
    /// Same requirements as [`Kernel::new`].
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, KernelError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());

        if height == 0 || width == 0 {
            return Err(KernelError::InvalidKernelShape(
                "kernel must not be empty".to_string(),
            ));
        }

        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != width)
        {
            return Err(KernelError::InvalidKernelShape(format!(
                "row {idx} has {} values, expected {width}",
                row.as_ref().len()
            )));
        }

        if height % 2 == 0 || width % 2 == 0 {
            return Err(KernelError::InvalidKernelShape(format!(
                "dimensions must be odd, got {height}x{width}"
            )));
        }

        let mut data = Vec::with_capacity(width * height);
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.as_ref().iter().enumerate() {
                if !value.is_finite() {
                    return Err(KernelError::NonFiniteValue(r, c));
                }
                data.push(value);
            }
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// The 1x1 kernel `[[1.0]]`, which leaves an image unchanged.
    pub fn identity() -> Self {
        Self {
            data: vec![1.0],
            width: 1,
            height: 1,
        }
    }

    /// Create a kernel by sampling a zero mean Gaussian.
    ///
    /// See [`gaussian_kernel_2d`].
    pub fn gaussian(width: usize, height: usize, variance: f64) -> Result<Self, KernelError> {
        gaussian_kernel_2d(width, height, variance)
    }

    /// Get the number of rows of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the number of columns of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the largest row offset from the center, `height / 2`.
    pub fn half_height(&self) -> usize {
        self.height / 2
    }

    /// Get the largest column offset from the center, `width / 2`.
    pub fn half_width(&self) -> usize {
        self.width / 2
    }

    /// Get the row at a signed offset from the kernel center.
    ///
    /// # Panics
    ///
    /// If `offset` lies outside `-half_height..=half_height`.
    pub fn row(&self, offset: isize) -> &[f64] {
        let half = self.half_height() as isize;
        assert!(
            (-half..=half).contains(&offset),
            "kernel row offset {offset} out of range -{half}..={half}"
        );
        let start = (offset + half) as usize * self.width;
        &self.data[start..start + self.width]
    }

    /// Get the weight at a signed (row, col) offset from the kernel center.
    ///
    /// Returns `None` when the offset falls outside the kernel.
    pub fn get(&self, dy: isize, dx: isize) -> Option<f64> {
        let r = dy.checked_add(self.half_height() as isize)?;
        let c = dx.checked_add(self.half_width() as isize)?;
        if r < 0 || c < 0 || r as usize >= self.height || c as usize >= self.width {
            return None;
        }
        self.data.get(r as usize * self.width + c as usize).copied()
    }

    /// Get the sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Get the weights as a row-major slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Rescale the weights in place so they sum to one.
    ///
    /// Returns the factor every weight was multiplied with, `1 / sum`.
    ///
    /// # Errors
    ///
    /// [`KernelError::DegenerateKernel`] if the weights sum to zero or to a non finite
    /// value, or if rescaling would produce a non finite weight. The kernel is left
    /// untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapconv_imgproc::kernel::Kernel;
    ///
    /// let mut kernel = Kernel::new(vec![vec![1.0, 2.0, 1.0]]).unwrap();
    /// let factor = kernel.normalize().unwrap();
    ///
    /// assert_eq!(factor, 0.25);
    /// assert_eq!(kernel[0], [0.25, 0.5, 0.25]);
    /// ```
    pub fn normalize(&mut self) -> Result<f64, KernelError> {
        let sum = self.sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(KernelError::DegenerateKernel(sum));
        }

        // tiny sums overflow the factor or the scaled weights
        let factor = 1.0 / sum;
        let scaled = self.data.iter().map(|w| w * factor).collect::<Vec<_>>();
        if !factor.is_finite() || scaled.iter().any(|w| !w.is_finite()) {
            return Err(KernelError::DegenerateKernel(sum));
        }

        self.data = scaled;
        log::debug!(
            "normalized {}x{} kernel, sum {sum} scaled by {factor}",
            self.height,
            self.width
        );

        Ok(factor)
    }
}

/// Center-relative row access, `kernel[-1]` is the row above the center.
impl Index<isize> for Kernel {
    type Output = [f64];

    fn index(&self, offset: isize) -> &Self::Output {
        self.row(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_shape() -> Result<(), KernelError> {
        let kernel = Kernel::new(vec![vec![1.0; 5]; 3])?;
        assert_eq!(kernel.height(), 3);
        assert_eq!(kernel.width(), 5);
        assert_eq!(kernel.half_height(), 1);
        assert_eq!(kernel.half_width(), 2);
        assert_eq!(kernel.as_slice().len(), 15);
        Ok(())
    }

    #[test]
    fn test_kernel_invalid_shape() {
        let empty: Vec<Vec<f64>> = vec![];
        assert!(matches!(
            Kernel::new(empty),
            Err(KernelError::InvalidKernelShape(_))
        ));
        assert!(matches!(
            Kernel::new(vec![vec![]]),
            Err(KernelError::InvalidKernelShape(_))
        ));
        assert!(matches!(
            Kernel::new(vec![vec![1.0, 1.0]]),
            Err(KernelError::InvalidKernelShape(_))
        ));
        assert!(matches!(
            Kernel::new(vec![vec![1.0]; 2]),
            Err(KernelError::InvalidKernelShape(_))
        ));
        assert!(matches!(
            Kernel::new(vec![vec![1.0; 3], vec![1.0; 3], vec![1.0; 1]]),
            Err(KernelError::InvalidKernelShape(_))
        ));
    }

    #[test]
    fn test_kernel_non_finite() {
        assert_eq!(
            Kernel::new(vec![vec![1.0, f64::NAN, 1.0]]),
            Err(KernelError::NonFiniteValue(0, 1))
        );
    }

    #[test]
    fn test_kernel_owns_data() -> Result<(), KernelError> {
        let mut rows = vec![vec![1.0, 2.0, 3.0]];
        let kernel = Kernel::from_rows(&rows)?;
        rows[0][0] = 42.0;
        assert_eq!(kernel[0], [1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_kernel_center_relative_access() -> Result<(), KernelError> {
        let kernel = Kernel::new(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ])?;
        assert_eq!(kernel[-1], [1.0, 2.0, 3.0]);
        assert_eq!(kernel.row(0), [4.0, 5.0, 6.0]);
        assert_eq!(kernel[1], [7.0, 8.0, 9.0]);
        assert_eq!(kernel.get(0, 0), Some(5.0));
        assert_eq!(kernel.get(-1, 1), Some(3.0));
        assert_eq!(kernel.get(1, -1), Some(7.0));
        assert_eq!(kernel.get(2, 0), None);
        assert_eq!(kernel.get(0, -2), None);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_kernel_row_out_of_range() {
        let kernel = Kernel::identity();
        let _ = kernel.row(1);
    }

    #[test]
    fn test_kernel_normalize() -> Result<(), KernelError> {
        let mut kernel = Kernel::new(vec![
            vec![1.0, 2.0, 1.0],
            vec![2.0, 4.0, 2.0],
            vec![1.0, 2.0, 1.0],
        ])?;
        let factor = kernel.normalize()?;
        assert_relative_eq!(factor, 1.0 / 16.0);
        assert_relative_eq!(kernel.sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(kernel[0][1], 0.25);

        // a normalized kernel is scaled by one
        let factor = kernel.normalize()?;
        assert_relative_eq!(factor, 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_kernel_normalize_negative_weights() -> Result<(), KernelError> {
        let mut kernel = Kernel::new(vec![
            vec![0.0, -1.0, 0.0],
            vec![-1.0, 6.0, -1.0],
            vec![0.0, -1.0, 0.0],
        ])?;
        let factor = kernel.normalize()?;
        assert_relative_eq!(factor, 0.5);
        assert_relative_eq!(kernel.get(0, 0).unwrap_or_default(), 3.0);
        Ok(())
    }

    #[test]
    fn test_kernel_normalize_zero_sum() -> Result<(), KernelError> {
        let mut kernel = Kernel::new(vec![vec![-1.0, 0.0, 1.0]])?;
        assert_eq!(kernel.normalize(), Err(KernelError::DegenerateKernel(0.0)));
        assert_eq!(kernel[0], [-1.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_kernel_normalize_subnormal_sum() -> Result<(), KernelError> {
        let mut kernel = Kernel::new(vec![vec![1e-309]])?;
        assert_eq!(
            kernel.normalize(),
            Err(KernelError::DegenerateKernel(1e-309))
        );
        assert_eq!(kernel[0], [1e-309]);
        assert!(kernel.as_slice().iter().all(|w| w.is_finite()));

        // the factor is finite but a scaled weight overflows
        let mut kernel = Kernel::new(vec![vec![1e308, -1e308, 1e-10]])?;
        assert!(matches!(
            kernel.normalize(),
            Err(KernelError::DegenerateKernel(_))
        ));
        assert_eq!(kernel[0], [1e308, -1e308, 1e-10]);
        Ok(())
    }
}
