use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use wrapconv_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for image data types.
///
/// A sample type widens losslessly into `f32` and narrows back with [`ImageDtype::from_f32`].
/// Send and Sync is required to sweep rows in parallel.
pub trait ImageDtype: Copy + Default + Into<f32> + Send + Sync {
    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

impl ImageDtype for u16 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, u16::MAX as f32) as u16
    }
}

/// Represents an image with pixel data.
///
/// The pixel data is stored row-major with shape (H, W, C), where H is the height of the image,
/// W the width and C the number of channels of every sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapconv_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        if data.len() != size.width * size.height * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapconv_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     0u8,
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// If a value is not representable in the target type, an error is returned.
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Widen the pixel data to `f32` without loss.
    pub fn widen(&self) -> Image<f32, CHANNELS>
    where
        T: ImageDtype,
    {
        Image {
            size: self.size,
            data: self.data.iter().map(|&x| x.into()).collect(),
        }
    }

    /// Narrow `f32` pixel data into another sample type.
    ///
    /// Every channel goes through [`ImageDtype::from_f32`], which rounds and clamps
    /// into the representable range of the target type.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapconv_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 3>::new(
    ///     ImageSize { width: 1, height: 1 },
    ///     vec![-3.0, 127.6, 300.0],
    /// ).unwrap();
    ///
    /// let narrowed = image.narrow::<u8>();
    /// assert_eq!(narrowed.as_slice(), &[0, 128, 255]);
    /// ```
    pub fn narrow<U>(&self) -> Image<U, CHANNELS>
    where
        T: Into<f32> + Copy,
        U: ImageDtype,
    {
        Image {
            size: self.size,
            data: self.data.iter().map(|&x| U::from_f32(x.into())).collect(),
        }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get a single channel value at `[row, col, channel]`.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [row, col, ch] = index;
        if row >= self.height() || col >= self.width() || ch >= CHANNELS {
            return None;
        }
        self.data.get((row * self.width() + col) * CHANNELS + ch)
    }

    /// Get all channels of the sample at (`row`, `col`).
    pub fn pixel(&self, row: usize, col: usize) -> Option<&[T]> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        let offset = (row * self.width() + col) * CHANNELS;
        self.data.get(offset..offset + CHANNELS)
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(ImageSize::from([10, 20]), image_size);
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.cols(), 10);
        assert_eq!(image.rows(), 20);
        assert_eq!(image.num_channels(), 3);

        Ok(())
    }

    #[test]
    fn image_wrong_data_length() {
        let res = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0u8; 11],
        );
        assert_eq!(res, Err(ImageError::InvalidChannelShape(11, 12)));
    }

    #[test]
    fn image_get_and_pixel() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                height: 2,
                width: 1,
            },
            vec![0, 1, 2, 3, 4, 5],
        )?;
        assert_eq!(image.get([1, 0, 2]), Some(&5u8));
        assert_eq!(image.get([2, 0, 0]), None);
        assert_eq!(image.get([0, 0, 3]), None);
        assert_eq!(image.pixel(1, 0), Some(&[3u8, 4, 5][..]));
        assert_eq!(image.pixel(0, 1), None);

        Ok(())
    }

    #[test]
    fn image_cast() -> Result<(), ImageError> {
        let image_u8 = Image::<_, 3>::new(
            ImageSize {
                height: 2,
                width: 1,
            },
            vec![0u8, 1, 2, 3, 4, 5],
        )?;

        let image_i32: Image<i32, 3> = image_u8.cast()?;
        assert_eq!(image_i32.get([1, 0, 2]), Some(&5i32));

        let image_neg = Image::<i32, 1>::new(
            ImageSize {
                height: 1,
                width: 1,
            },
            vec![-1],
        )?;
        assert_eq!(image_neg.cast::<u8>(), Err(ImageError::CastError));

        Ok(())
    }

    #[test]
    fn image_widen_narrow() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                height: 1,
                width: 2,
            },
            vec![0, 17, 255, 128, 64, 1],
        )?;

        let wide = image.widen();
        assert_eq!(wide.as_slice(), &[0.0, 17.0, 255.0, 128.0, 64.0, 1.0]);
        assert_eq!(wide.narrow::<u8>(), image);

        Ok(())
    }

    #[test]
    fn image_narrow_rounds_and_clamps() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                height: 1,
                width: 5,
            },
            vec![-0.4, 0.5, 254.49, 255.5, 1e6],
        )?;
        assert_eq!(image.narrow::<u8>().as_slice(), &[0, 1, 254, 255, 255]);

        Ok(())
    }

    #[test]
    fn image_u16_widen_narrow() -> Result<(), ImageError> {
        let image = Image::<u16, 2>::new(
            ImageSize {
                height: 1,
                width: 2,
            },
            vec![0, 1000, 40000, u16::MAX],
        )?;
        let wide = image.widen();
        assert_eq!(wide.as_slice(), &[0.0, 1000.0, 40000.0, 65535.0]);
        assert_eq!(wide.narrow::<u16>(), image);

        let out_of_range = Image::<f32, 1>::new(
            ImageSize {
                height: 1,
                width: 4,
            },
            vec![-7.0, 1000.5, 65535.4, 1e9],
        )?;
        assert_eq!(
            out_of_range.narrow::<u16>().as_slice(),
            &[0, 1001, u16::MAX, u16::MAX]
        );

        Ok(())
    }
}
