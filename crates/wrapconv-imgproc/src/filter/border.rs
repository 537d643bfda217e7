/// How a kernel reads samples past the image border.
///
/// Both modes treat the image as a torus: a read past the left edge lands on the right side
/// and a read past the top lands at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Remap out of range reads using the kernel offset rather than the overflow.
    ///
    /// A read before the start lands on `len + offset`, a read past the end on `offset - 1`.
    /// This matches true wrapping for offsets of magnitude one (3 wide kernels) but can skip
    /// samples near the border for larger kernels.
    #[default]
    OffsetWrap,

    /// Wrap with a Euclidean modulo, `(pos + offset) mod len`.
    Toroidal,
}

/// Map a kernel read at `pos + offset` to a sample index in `0..len`.
///
/// # Arguments
///
/// * `pos` - The output row or column.
/// * `offset` - The kernel offset from its center.
/// * `len` - The image height or width, non zero.
/// * `mode` - The border handling mode.
///
/// For [`BorderMode::OffsetWrap`], a remapped index that still falls outside the image
/// (kernels larger than the image) is reduced modulo `len`.
///
/// # Examples
///
/// ```
/// use wrapconv_imgproc::filter::{border_index, BorderMode};
///
/// assert_eq!(border_index(0, -1, 4, BorderMode::OffsetWrap), 3);
/// assert_eq!(border_index(2, 2, 4, BorderMode::OffsetWrap), 1);
/// assert_eq!(border_index(2, 2, 4, BorderMode::Toroidal), 0);
/// ```
#[inline]
pub fn border_index(pos: usize, offset: isize, len: usize, mode: BorderMode) -> usize {
    let len_i = len as isize;
    let used = pos as isize + offset;

    match mode {
        BorderMode::OffsetWrap => {
            let remapped = if used < 0 {
                len_i + offset
            } else if used >= len_i {
                offset - 1
            } else {
                used
            };
            remapped.rem_euclid(len_i) as usize
        }
        BorderMode::Toroidal => used.rem_euclid(len_i) as usize,
    }
}
