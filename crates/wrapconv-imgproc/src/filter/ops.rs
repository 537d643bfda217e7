use wrapconv_image::{Image, ImageDtype};

use super::{convolve_pass_into, ConvolveOptions, FilterError};
use crate::kernel::Kernel;

/// Convolve an image with a kernel into a new `f32` image.
///
/// The source samples are widened to `f32` and the output is not rounded or clamped.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `options` - Border mode and execution strategy.
pub fn convolve_pass<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    options: &ConvolveOptions,
) -> Result<Image<f32, C>, FilterError>
where
    T: ImageDtype,
{
    let mut dst = Image::from_size_val(src.size(), 0.0)?;
    convolve_pass_into(src, kernel, options, &mut dst)?;
    Ok(dst)
}

/// Convolve an image with a kernel.
///
/// Uses the default [`ConvolveOptions`], see [`convolve_with`].
///
/// # Examples
///
/// ```
/// use wrapconv_image::{Image, ImageSize};
/// use wrapconv_imgproc::{filter::convolve, kernel::Kernel};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![10, 20, 30, 40, 50, 60],
/// ).unwrap();
///
/// let blurred = convolve(&image, &Kernel::new(vec![vec![0.25, 0.5, 0.25]]).unwrap()).unwrap();
/// assert_eq!(blurred.as_slice(), &[25, 35, 45, 25, 35, 45]);
/// ```
pub fn convolve<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
) -> Result<Image<T, C>, FilterError>
where
    T: ImageDtype,
{
    convolve_with(src, kernel, &ConvolveOptions::default())
}

/// Convolve an image with a kernel and narrow the result to the source sample type.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `options` - Border mode and execution strategy.
///
/// # Returns
///
/// A new image of the same size, each channel rounded and clamped by [`ImageDtype::from_f32`].
pub fn convolve_with<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    options: &ConvolveOptions,
) -> Result<Image<T, C>, FilterError>
where
    T: ImageDtype,
{
    Ok(convolve_pass(src, kernel, options)?.narrow())
}

/// Convolve an image with the same kernel `times` times.
///
/// Uses the default [`ConvolveOptions`], see [`iterative_convolve_with`].
pub fn iterative_convolve<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    times: usize,
) -> Result<Image<T, C>, FilterError>
where
    T: ImageDtype,
{
    iterative_convolve_with(src, kernel, times, &ConvolveOptions::default())
}

/// Convolve an image with the same kernel `times` times.
///
/// The first pass widens the source into `f32`, later passes read and write `f32` images,
/// and only the last result is narrowed back to the source sample type. Rounding and
/// clamping therefore happen once instead of after every pass.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `times` - The number of passes, at least one.
/// * `options` - Border mode and execution strategy.
///
/// Every pass schedules its rows with `options.strategy`. With
/// [`ExecutionStrategy::Fixed`](crate::parallel::ExecutionStrategy::Fixed) a new thread pool
/// is built for each pass, so prefer `ParallelRows` for large `times`.
///
/// # Errors
///
/// [`FilterError::InvalidIterationCount`] if `times` is zero.
pub fn iterative_convolve_with<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    times: usize,
    options: &ConvolveOptions,
) -> Result<Image<T, C>, FilterError>
where
    T: ImageDtype,
{
    if times == 0 {
        return Err(FilterError::InvalidIterationCount(times));
    }

    let mut current = convolve_pass(src, kernel, options)?;
    let mut scratch = Image::from_size_val(src.size(), 0.0)?;

    for pass in 1..times {
        convolve_pass_into(&current, kernel, options, &mut scratch)?;
        std::mem::swap(&mut current, &mut scratch);
        log::debug!("convolution pass {}/{times} done", pass + 1);
    }

    Ok(current.narrow())
}

/// Blur an image with a normalized Gaussian kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (width, height), both odd.
/// * `variance` - The variance of the Gaussian.
/// * `times` - The number of blur passes, at least one.
///
/// # Examples
///
/// ```
/// use wrapconv_image::{Image, ImageSize};
/// use wrapconv_imgproc::filter::gaussian_blur;
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 8, height: 8 }, 90).unwrap();
/// let blurred = gaussian_blur(&image, (5, 5), 2.0, 3).unwrap();
///
/// assert_eq!(blurred, image);
/// ```
pub fn gaussian_blur<T, const C: usize>(
    src: &Image<T, C>,
    kernel_size: (usize, usize),
    variance: f64,
    times: usize,
) -> Result<Image<T, C>, FilterError>
where
    T: ImageDtype,
{
    let mut kernel = Kernel::gaussian(kernel_size.0, kernel_size.1, variance)?;
    kernel.normalize()?;
    iterative_convolve(src, &kernel, times)
}
