use wrapconv_image::{Image, ImageDtype, ImageError};

use super::{border_index, BorderMode, FilterError};
use crate::{kernel::Kernel, parallel, parallel::ExecutionStrategy};

/// Options shared by the convolution operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvolveOptions {
    /// How reads past the image border are remapped.
    pub border: BorderMode,
    /// How the output rows are scheduled.
    pub strategy: ExecutionStrategy,
}

/// Run one convolution pass into an `f32` image.
///
/// Every output sample is the weighted sum of the kernel sized neighborhood around the
/// same position in `src`, accumulated per channel in `f64`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `options` - Border mode and execution strategy.
/// * `dst` - The destination image with shape (H, W, C).
///
/// # Errors
///
/// [`ImageError::InvalidImageSize`] if `src` and `dst` differ in size.
pub fn convolve_pass_into<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    options: &ConvolveOptions,
    dst: &mut Image<f32, C>,
) -> Result<(), FilterError>
where
    T: ImageDtype,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(src.size(), dst.size()).into());
    }

    let (height, width) = (src.height(), src.width());
    if height == 0 || width == 0 {
        return Ok(());
    }

    if kernel.height() > height || kernel.width() > width {
        log::warn!(
            "{}x{} kernel is larger than the {}x{} image, border reads will repeat samples",
            kernel.height(),
            kernel.width(),
            height,
            width
        );
    }

    let half_h = kernel.half_height() as isize;
    let half_w = kernel.half_width() as isize;

    // source column for every (output column, kernel column) pair
    let src_cols = (0..width)
        .flat_map(|col| {
            (-half_w..=half_w).map(move |kx| border_index(col, kx, width, options.border))
        })
        .collect::<Vec<_>>();

    let src_data = src.as_slice();

    parallel::for_each_row(
        dst.as_slice_mut(),
        width * C,
        options.strategy,
        |row, dst_row| {
            for (col, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                let cols = &src_cols[col * kernel.width()..(col + 1) * kernel.width()];
                let mut acc = [0.0f64; C];

                for ky in -half_h..=half_h {
                    let src_row = border_index(row, ky, height, options.border) * width;
                    for (&weight, &src_col) in kernel.row(ky).iter().zip(cols) {
                        let offset = (src_row + src_col) * C;
                        for (a, &v) in acc.iter_mut().zip(&src_data[offset..offset + C]) {
                            *a += f64::from(Into::<f32>::into(v)) * weight;
                        }
                    }
                }

                dst_pixel
                    .iter_mut()
                    .zip(acc.iter())
                    .for_each(|(d, &a)| *d = a as f32);
            }
        },
    )?;

    Ok(())
}
