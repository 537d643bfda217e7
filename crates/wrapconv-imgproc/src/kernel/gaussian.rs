use std::f64::consts::PI;

use super::{Kernel, KernelError};

/// Evaluate the normal probability density function.
///
/// # Arguments
///
/// * `x` - The point to evaluate.
/// * `mean` - The mean of the distribution.
/// * `variance` - The variance of the distribution, expected to be positive.
///
/// # Returns
///
/// `exp(-(x - mean)^2 / (2 variance)) / sqrt(2 pi variance)`
///
/// # Examples
///
/// ```
/// use wrapconv_imgproc::kernel::gaussian_pdf;
///
/// let p = gaussian_pdf(1.0, 0.0, 1.0);
/// assert!((p - 0.24197072).abs() < 1e-5);
/// ```
pub fn gaussian_pdf(x: f64, mean: f64, variance: f64) -> f64 {
    let d = x - mean;
    (-(d * d) / (2.0 * variance)).exp() / (2.0 * PI * variance).sqrt()
}

/// Create a 2D kernel by sampling a zero mean Gaussian.
///
/// The weight at offset `(dy, dx)` from the center is `pdf(dx) * pdf(dy)`, the product of
/// the per-axis densities, which equals the isotropic 2D density at that offset. The
/// weights are not rescaled, call [`Kernel::normalize`] to make them sum to one.
///
/// # Arguments
///
/// * `width` - The number of kernel columns, odd.
/// * `height` - The number of kernel rows, odd.
/// * `variance` - The variance of the distribution, positive.
///
/// # Errors
///
/// [`KernelError::InvalidArgument`] if a dimension is even (including zero) or the
/// variance is not a positive finite number.
///
/// # Examples
///
/// ```
/// use wrapconv_imgproc::kernel::gaussian_kernel_2d;
///
/// let mut kernel = gaussian_kernel_2d(5, 3, 1.5).unwrap();
/// assert_eq!(kernel.width(), 5);
/// assert_eq!(kernel.height(), 3);
///
/// kernel.normalize().unwrap();
/// assert!((kernel.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn gaussian_kernel_2d(
    width: usize,
    height: usize,
    variance: f64,
) -> Result<Kernel, KernelError> {
    if width % 2 == 0 || height % 2 == 0 {
        return Err(KernelError::InvalidArgument(format!(
            "gaussian kernel dimensions must be odd and positive, got {width}x{height}"
        )));
    }

    if !(variance.is_finite() && variance > 0.0) {
        return Err(KernelError::InvalidArgument(format!(
            "gaussian variance must be positive, got {variance}"
        )));
    }

    // both axes share the variance, so one table per axis is enough
    let axis = |len: usize| -> Vec<f64> {
        let half = (len / 2) as isize;
        (-half..=half)
            .map(|offset| gaussian_pdf(offset as f64, 0.0, variance))
            .collect()
    };
    let weights_x = axis(width);
    let weights_y = axis(height);

    let data = weights_y
        .iter()
        .flat_map(|wy| weights_x.iter().map(move |wx| wx * wy))
        .collect();

    log::debug!("sampled {height}x{width} gaussian kernel, variance {variance}");

    Ok(Kernel {
        data,
        width,
        height,
    })
}
