//! Resampling entry points and shape dispatch.
//!
//! Three entry points mirror the three directions of intent: a unified
//! [`resample_2d`] that picks the kernel from the shape comparison alone,
//! plus dedicated [`upsample_2d`] and [`downsample_2d`] that additionally
//! accept a pair of affine transforms to resample an explicit sub-region of
//! the source at an explicit resolution. Each has an `_into` form writing to
//! a caller-supplied output buffer.

use std::borrow::Cow;

use gridsample_grid::{AffineTransform, Grid, GridElement, GridSize};

use crate::downsample::downsample_into;
use crate::error::ResampleError;
use crate::fill::{mask_output, resolve_fill, source_mask, MaskView};
use crate::methods::{Downsampling, Upsampling};
use crate::reconcile::{reconcile, Direction, ScaleOffset};
use crate::upsample::upsample_into;

/// Options shared by the resampling entry points.
///
/// # Examples
///
/// ```
/// use gridsample_resample::ResampleOptions;
///
/// let opts = ResampleOptions::<f32>::default()
///     .with_fill_value(-9999.0)
///     .with_mode_rank(2);
/// assert_eq!(opts.fill_value, Some(-9999.0));
/// assert_eq!(opts.mode_rank, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleOptions<T: GridElement> {
    /// Explicit fill value for output cells with no valid contribution.
    /// When `None` it is resolved from the source grid, then the output
    /// buffer, then the element type's conventional default.
    pub fill_value: Option<T>,
    /// Rank of the frequency selected by [`Downsampling::Mode`]; one means
    /// the most frequent value, two the second most frequent, and so forth.
    pub mode_rank: usize,
}

impl<T: GridElement> Default for ResampleOptions<T> {
    fn default() -> Self {
        Self {
            fill_value: None,
            mode_rank: 1,
        }
    }
}

impl<T: GridElement> ResampleOptions<T> {
    /// Set an explicit fill value.
    pub fn with_fill_value(mut self, fill_value: T) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    /// Set the mode rank.
    pub fn with_mode_rank(mut self, mode_rank: usize) -> Self {
        self.mode_rank = mode_rank;
        self
    }
}

/// Resample a 2-D grid to a new resolution.
///
/// The kernel is chosen from the shape comparison alone: a target smaller on
/// both axes aggregates with `ds_method`, a larger one interpolates with
/// `us_method`, and a mixed target (one axis smaller, one larger) aggregates
/// into an intermediate grid before interpolating. A target with the
/// source's own shape returns the source unchanged.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `width` - The target grid width.
/// * `height` - The target grid height.
/// * `ds_method` - Cell aggregation method for a possible downsampling.
/// * `us_method` - Cell interpolation method for a possible upsampling.
/// * `opts` - Fill-value and mode-rank options.
///
/// # Returns
///
/// The resampled grid; `Cow::Borrowed` when the target shape equals the
/// source shape. If the source carries a validity mask, so does the result.
///
/// # Example
///
/// ```
/// use gridsample_grid::{Grid, GridSize};
/// use gridsample_resample::{resample_2d, Downsampling, ResampleOptions, Upsampling};
///
/// let src = Grid::<f32>::new(
///     GridSize {
///         width: 4,
///         height: 4,
///     },
///     vec![1.0; 16],
/// )
/// .unwrap();
///
/// let result = resample_2d(
///     &src,
///     2,
///     2,
///     Downsampling::Mean,
///     Upsampling::Linear,
///     &ResampleOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.size().width, 2);
/// assert_eq!(result.size().height, 2);
/// ```
pub fn resample_2d<'a, T: GridElement>(
    src: &'a Grid<T>,
    width: usize,
    height: usize,
    ds_method: Downsampling,
    us_method: Upsampling,
    opts: &ResampleOptions<T>,
) -> Result<Cow<'a, Grid<T>>, ResampleError> {
    if ds_method == Downsampling::Mode && opts.mode_rank < 1 {
        return Err(ResampleError::InvalidModeRank(opts.mode_rank));
    }
    let out_size = GridSize { width, height };
    if out_size == src.size() {
        return Ok(Cow::Borrowed(src));
    }

    let mut dst = Grid::from_size_val(out_size, T::default())?;
    let fill_value = resolve_fill(opts.fill_value, src, None);
    let mask = source_mask(src);
    dispatch(
        src,
        mask,
        ds_method,
        us_method,
        fill_value,
        opts.mode_rank,
        &mut dst,
    )?;
    mask_output(&mut dst, src, fill_value);
    Ok(Cow::Owned(dst))
}

/// Resample a 2-D grid into a caller-supplied output buffer.
///
/// Behaves like [`resample_2d`] but writes into `dst`, whose shape must
/// equal `(height, width)`. A target shape equal to the source copies the
/// source into `dst`. Validation completes before `dst` is touched.
pub fn resample_2d_into<T: GridElement>(
    src: &Grid<T>,
    dst: &mut Grid<T>,
    width: usize,
    height: usize,
    ds_method: Downsampling,
    us_method: Upsampling,
    opts: &ResampleOptions<T>,
) -> Result<(), ResampleError> {
    let out_size = GridSize { width, height };
    if dst.size() != out_size {
        return Err(ResampleError::ShapeMismatch(dst.size(), out_size));
    }
    if ds_method == Downsampling::Mode && opts.mode_rank < 1 {
        return Err(ResampleError::InvalidModeRank(opts.mode_rank));
    }

    let fill_value = resolve_fill(opts.fill_value, src, Some(dst));
    let mask = source_mask(src);
    if out_size == src.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
    } else {
        dispatch(
            src,
            mask,
            ds_method,
            us_method,
            fill_value,
            opts.mode_rank,
            dst,
        )?;
    }
    mask_output(dst, src, fill_value);
    Ok(())
}

/// Upsample a 2-D grid to a higher resolution by interpolating source cells.
///
/// Without transforms, `width` and `height` must be greater than or equal to
/// the source's and the scaling is derived from the shape ratio. With both
/// transforms given, the output may cover any sub-region of the source and
/// the output pixel size must not be coarser than the source's on either
/// axis.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `width` - The target grid width.
/// * `height` - The target grid height.
/// * `method` - Cell interpolation method.
/// * `src_transform` - Affine transform of the source grid; rotation terms
///   are not supported. Both or neither of the transforms must be given.
/// * `out_transform` - Affine transform of the output grid.
/// * `opts` - Fill-value options.
///
/// # Example
///
/// ```
/// use gridsample_grid::{AffineTransform, Grid, GridSize};
/// use gridsample_resample::{upsample_2d, ResampleOptions, Upsampling};
///
/// let src = Grid::<f64>::new(
///     GridSize {
///         width: 2,
///         height: 2,
///     },
///     vec![0.0, 0.0, 1.0, 1.0],
/// )
/// .unwrap();
///
/// let src_t = AffineTransform::from([1.0, 0.0, 0.0, 0.0, -1.0, 4.0]);
/// let out_t = AffineTransform::from([0.5, 0.0, 0.5, 0.0, -0.5, 3.5]);
///
/// let result = upsample_2d(
///     &src,
///     2,
///     2,
///     Upsampling::LinearMidpoint,
///     Some(&src_t),
///     Some(&out_t),
///     &ResampleOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.as_slice(), &[0.25, 0.25, 0.75, 0.75]);
/// ```
pub fn upsample_2d<'a, T: GridElement>(
    src: &'a Grid<T>,
    width: usize,
    height: usize,
    method: Upsampling,
    src_transform: Option<&AffineTransform>,
    out_transform: Option<&AffineTransform>,
    opts: &ResampleOptions<T>,
) -> Result<Cow<'a, Grid<T>>, ResampleError> {
    let out_size = GridSize { width, height };
    let geo = reconcile(src_transform, out_transform, src.size(), out_size, Direction::Up)?;
    // with transforms an equal shape may still be a sub-region resample
    if out_size == src.size() && geo.map_or(true, ScaleOffset::is_identity) {
        return Ok(Cow::Borrowed(src));
    }

    let mut dst = Grid::from_size_val(out_size, T::default())?;
    let fill_value = resolve_fill(opts.fill_value, src, None);
    let mask = source_mask(src);
    upsample_into(src, mask, method, fill_value, &mut dst, geo)?;
    mask_output(&mut dst, src, fill_value);
    Ok(Cow::Owned(dst))
}

/// Upsample a 2-D grid into a caller-supplied output buffer.
///
/// Behaves like [`upsample_2d`] but writes into `dst`, whose shape must
/// equal `(height, width)`. Validation completes before `dst` is touched.
pub fn upsample_2d_into<T: GridElement>(
    src: &Grid<T>,
    dst: &mut Grid<T>,
    width: usize,
    height: usize,
    method: Upsampling,
    src_transform: Option<&AffineTransform>,
    out_transform: Option<&AffineTransform>,
    opts: &ResampleOptions<T>,
) -> Result<(), ResampleError> {
    let out_size = GridSize { width, height };
    if dst.size() != out_size {
        return Err(ResampleError::ShapeMismatch(dst.size(), out_size));
    }
    let geo = reconcile(src_transform, out_transform, src.size(), out_size, Direction::Up)?;

    let fill_value = resolve_fill(opts.fill_value, src, Some(dst));
    let mask = source_mask(src);
    if out_size == src.size() && geo.map_or(true, ScaleOffset::is_identity) {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
    } else {
        upsample_into(src, mask, method, fill_value, dst, geo)?;
    }
    mask_output(dst, src, fill_value);
    Ok(())
}

/// Downsample a 2-D grid to a lower resolution by aggregating source cells.
///
/// Without transforms, `width` and `height` must be less than or equal to
/// the source's and the scaling is derived from the shape ratio. With both
/// transforms given, the output may cover any sub-region of the source and
/// the output pixel size must not be finer than the source's on either axis.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `width` - The target grid width.
/// * `height` - The target grid height.
/// * `method` - Cell aggregation method.
/// * `src_transform` - Affine transform of the source grid; rotation terms
///   are not supported. Both or neither of the transforms must be given.
/// * `out_transform` - Affine transform of the output grid.
/// * `opts` - Fill-value and mode-rank options.
///
/// # Example
///
/// ```
/// use gridsample_grid::{Grid, GridSize};
/// use gridsample_resample::{downsample_2d, Downsampling, ResampleOptions};
///
/// let src = Grid::<f64>::new(
///     GridSize {
///         width: 4,
///         height: 2,
///     },
///     vec![1.0, 3.0, 5.0, 7.0, 1.0, 3.0, 5.0, 7.0],
/// )
/// .unwrap();
///
/// let result = downsample_2d(
///     &src,
///     2,
///     1,
///     Downsampling::Mean,
///     None,
///     None,
///     &ResampleOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.as_slice(), &[2.0, 6.0]);
/// ```
pub fn downsample_2d<'a, T: GridElement>(
    src: &'a Grid<T>,
    width: usize,
    height: usize,
    method: Downsampling,
    src_transform: Option<&AffineTransform>,
    out_transform: Option<&AffineTransform>,
    opts: &ResampleOptions<T>,
) -> Result<Cow<'a, Grid<T>>, ResampleError> {
    if method == Downsampling::Mode && opts.mode_rank < 1 {
        return Err(ResampleError::InvalidModeRank(opts.mode_rank));
    }
    let out_size = GridSize { width, height };
    let geo = reconcile(src_transform, out_transform, src.size(), out_size, Direction::Down)?;
    if out_size == src.size() && geo.map_or(true, ScaleOffset::is_identity) {
        return Ok(Cow::Borrowed(src));
    }

    let mut dst = Grid::from_size_val(out_size, T::default())?;
    let fill_value = resolve_fill(opts.fill_value, src, None);
    let mask = source_mask(src);
    downsample_into(src, mask, method, fill_value, opts.mode_rank, &mut dst, geo)?;
    mask_output(&mut dst, src, fill_value);
    Ok(Cow::Owned(dst))
}

/// Downsample a 2-D grid into a caller-supplied output buffer.
///
/// Behaves like [`downsample_2d`] but writes into `dst`, whose shape must
/// equal `(height, width)`. Validation completes before `dst` is touched.
pub fn downsample_2d_into<T: GridElement>(
    src: &Grid<T>,
    dst: &mut Grid<T>,
    width: usize,
    height: usize,
    method: Downsampling,
    src_transform: Option<&AffineTransform>,
    out_transform: Option<&AffineTransform>,
    opts: &ResampleOptions<T>,
) -> Result<(), ResampleError> {
    if method == Downsampling::Mode && opts.mode_rank < 1 {
        return Err(ResampleError::InvalidModeRank(opts.mode_rank));
    }
    let out_size = GridSize { width, height };
    if dst.size() != out_size {
        return Err(ResampleError::ShapeMismatch(dst.size(), out_size));
    }
    let geo = reconcile(src_transform, out_transform, src.size(), out_size, Direction::Down)?;

    let fill_value = resolve_fill(opts.fill_value, src, Some(dst));
    let mask = source_mask(src);
    if out_size == src.size() && geo.map_or(true, ScaleOffset::is_identity) {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
    } else {
        downsample_into(src, mask, method, fill_value, opts.mode_rank, dst, geo)?;
    }
    mask_output(dst, src, fill_value);
    Ok(())
}

/// Pick the kernel from the shape comparison; the true mixed case runs the
/// downsampling kernel into an intermediate grid first.
///
/// The intermediate grid reuses the source's mask rather than one recomputed
/// from its own values, matching the historical behavior; see the crate
/// documentation for the accuracy implications.
fn dispatch<T: GridElement>(
    src: &Grid<T>,
    mask: Option<MaskView<'_>>,
    ds_method: Downsampling,
    us_method: Upsampling,
    fill_value: T,
    mode_rank: usize,
    dst: &mut Grid<T>,
) -> Result<(), ResampleError> {
    let (src_w, src_h) = (src.width(), src.height());
    let (out_w, out_h) = (dst.width(), dst.height());

    if out_w < src_w && out_h > src_h {
        log::debug!("mixed resample {src_w}x{src_h} -> {out_w}x{out_h}: shrink x, then grow y");
        let mut temp = Grid::from_size_val(
            GridSize {
                width: out_w,
                height: src_h,
            },
            T::default(),
        )?;
        downsample_into(src, mask, ds_method, fill_value, mode_rank, &mut temp, None)?;
        upsample_into(&temp, mask, us_method, fill_value, dst, None)
    } else if out_w > src_w && out_h < src_h {
        log::debug!("mixed resample {src_w}x{src_h} -> {out_w}x{out_h}: shrink y, then grow x");
        let mut temp = Grid::from_size_val(
            GridSize {
                width: src_w,
                height: out_h,
            },
            T::default(),
        )?;
        downsample_into(src, mask, ds_method, fill_value, mode_rank, &mut temp, None)?;
        upsample_into(&temp, mask, us_method, fill_value, dst, None)
    } else if out_w <= src_w && out_h <= src_h {
        downsample_into(src, mask, ds_method, fill_value, mode_rank, dst, None)
    } else {
        upsample_into(src, mask, us_method, fill_value, dst, None)
    }
}
