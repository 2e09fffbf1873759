//! Upsampling kernel: grow a grid by point or interpolated sampling.

use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};

use gridsample_grid::{Grid, GridElement};

use crate::error::ResampleError;
use crate::fill::{is_cell_valid, MaskView};
use crate::methods::Upsampling;
use crate::reconcile::ScaleOffset;

/// Blend a 2x2 neighborhood with weights `(wx, wy)`. When not all four
/// neighbors are valid, fall back to the single nearest-by-weight neighbor,
/// and to the fill value when that one is invalid too.
#[inline]
#[allow(clippy::too_many_arguments)]
fn blend_2x2<T: GridElement>(
    src_data: &[T],
    src_w: usize,
    mask: Option<MaskView<'_>>,
    y0: usize,
    y1: usize,
    x0: usize,
    x1: usize,
    wx: f64,
    wy: f64,
    fill_value: T,
) -> T {
    let v00 = src_data[y0 * src_w + x0];
    let v01 = src_data[y0 * src_w + x1];
    let v10 = src_data[y1 * src_w + x0];
    let v11 = src_data[y1 * src_w + x1];

    let v00_ok = is_cell_valid(v00, mask, y0, x0);
    let v01_ok = is_cell_valid(v01, mask, y0, x1);
    let v10_ok = is_cell_valid(v10, mask, y1, x0);
    let v11_ok = is_cell_valid(v11, mask, y1, x1);

    if v00_ok && v01_ok && v10_ok && v11_ok {
        let (v00, v01) = (v00.to_f64_lossy(), v01.to_f64_lossy());
        let (v10, v11) = (v10.to_f64_lossy(), v11.to_f64_lossy());
        let v0 = v00 + wx * (v01 - v00);
        let v1 = v10 + wx * (v11 - v10);
        return T::from_f64_lossy(v0 + wy * (v1 - v0));
    }

    // nearest according to weight
    let (value, ok) = if wx < 0.5 {
        if wy < 0.5 {
            (v00, v00_ok)
        } else {
            (v10, v10_ok)
        }
    } else if wy < 0.5 {
        (v01, v01_ok)
    } else {
        (v11, v11_ok)
    };
    if ok {
        value
    } else {
        fill_value
    }
}

/// Upsample `src` into `dst`.
///
/// Without a scale/offset mapping the scaling is derived from the shape
/// ratio; an equal target shape copies the source and a smaller target on
/// either axis is an error, since this kernel only grows.
pub(crate) fn upsample_into<T: GridElement>(
    src: &Grid<T>,
    mask: Option<MaskView<'_>>,
    method: Upsampling,
    fill_value: T,
    dst: &mut Grid<T>,
    geo: Option<ScaleOffset>,
) -> Result<(), ResampleError> {
    let src_w = src.width();
    let src_h = src.height();
    let out_w = dst.width();
    let out_h = dst.height();

    if geo.is_none() {
        if src.size() == dst.size() {
            dst.as_slice_mut().copy_from_slice(src.as_slice());
            return Ok(());
        }
        if out_w < src_w || out_h < src_h {
            return Err(ResampleError::InvalidTargetSize(
                dst.size(),
                "upsampling",
                src.size(),
            ));
        }
    }

    let (x_offset, y_offset) = match geo {
        Some(g) => (g.x_offset, g.y_offset),
        None => (0.0, 0.0),
    };

    let src_data = src.as_slice();

    match method {
        Upsampling::Nearest => {
            let (scale_x, scale_y) = match geo {
                Some(g) => (g.scale_x, g.scale_y),
                None => (src_w as f64 / out_w as f64, src_h as f64 / out_h as f64),
            };
            dst.as_slice_mut()
                .par_chunks_exact_mut(out_w)
                .enumerate()
                .for_each(|(out_y, row)| {
                    let src_y = ((y_offset + scale_y * out_y as f64) as usize).min(src_h - 1);
                    for (out_x, cell) in row.iter_mut().enumerate() {
                        let src_x = ((x_offset + scale_x * out_x as f64) as usize).min(src_w - 1);
                        let v = src_data[src_y * src_w + src_x];
                        *cell = if is_cell_valid(v, mask, src_y, src_x) {
                            v
                        } else {
                            fill_value
                        };
                    }
                });
        }

        Upsampling::Linear => {
            let (scale_x, scale_y) = match geo {
                Some(g) => (g.scale_x, g.scale_y),
                None => (
                    (src_w as f64 - 1.0) / if out_w > 1 { out_w as f64 - 1.0 } else { 1.0 },
                    (src_h as f64 - 1.0) / if out_h > 1 { out_h as f64 - 1.0 } else { 1.0 },
                ),
            };
            dst.as_slice_mut()
                .par_chunks_exact_mut(out_w)
                .enumerate()
                .for_each(|(out_y, row)| {
                    let src_yf = y_offset + scale_y * out_y as f64;
                    let src_y0 = (src_yf as usize).min(src_h - 1);
                    let wy = src_yf - src_y0 as f64;
                    let src_y1 = if src_y0 + 1 < src_h { src_y0 + 1 } else { src_y0 };
                    for (out_x, cell) in row.iter_mut().enumerate() {
                        let src_xf = x_offset + scale_x * out_x as f64;
                        let src_x0 = (src_xf as usize).min(src_w - 1);
                        let wx = src_xf - src_x0 as f64;
                        let src_x1 = if src_x0 + 1 < src_w { src_x0 + 1 } else { src_x0 };
                        *cell = blend_2x2(
                            src_data, src_w, mask, src_y0, src_y1, src_x0, src_x1, wx, wy,
                            fill_value,
                        );
                    }
                });
        }

        Upsampling::LinearMidpoint => {
            let (scale_x, scale_y) = match geo {
                Some(g) => (g.scale_x, g.scale_y),
                None => (src_w as f64 / out_w as f64, src_h as f64 / out_h as f64),
            };
            dst.as_slice_mut()
                .par_chunks_exact_mut(out_w)
                .enumerate()
                .for_each(|(out_y, row)| {
                    let src_yf = y_offset + scale_y * out_y as f64;
                    let mut src_y0 = (src_yf as usize).min(src_h - 1);
                    // weight relative to the midpoint of the destination footprint
                    let mut wy = (src_yf - src_y0 as f64 - 0.5) + 0.5 * scale_y;
                    let mut src_y1;
                    if wy < 0.0 {
                        if src_y0 > 0 {
                            wy += 1.0;
                            src_y1 = src_y0;
                            src_y0 -= 1;
                        } else {
                            src_y1 = src_y0;
                        }
                    } else {
                        src_y1 = src_y0 + 1;
                    }
                    if src_y1 >= src_h {
                        src_y1 = src_y0;
                    }
                    for (out_x, cell) in row.iter_mut().enumerate() {
                        let src_xf = x_offset + scale_x * out_x as f64;
                        let mut src_x0 = (src_xf as usize).min(src_w - 1);
                        let mut wx = (src_xf - src_x0 as f64 - 0.5) + 0.5 * scale_x;
                        let mut src_x1;
                        if wx < 0.0 {
                            if src_x0 > 0 {
                                wx += 1.0;
                                src_x1 = src_x0;
                                src_x0 -= 1;
                            } else {
                                src_x1 = src_x0;
                            }
                        } else {
                            src_x1 = src_x0 + 1;
                        }
                        if src_x1 >= src_w {
                            src_x1 = src_x0;
                        }
                        *cell = blend_2x2(
                            src_data, src_w, mask, src_y0, src_y1, src_x0, src_x1, wx, wy,
                            fill_value,
                        );
                    }
                });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsample_grid::GridSize;

    fn grid_2x2() -> Grid<f64> {
        Grid::new(
            GridSize {
                width: 2,
                height: 2,
            },
            vec![0.0, 1.0, 2.0, 3.0],
        )
        .unwrap()
    }

    #[test]
    fn nearest_shape_ratio() -> Result<(), ResampleError> {
        let src = grid_2x2();
        let mut dst = Grid::from_size_val(
            GridSize {
                width: 3,
                height: 3,
            },
            0.0,
        )
        .unwrap();
        upsample_into(&src, None, Upsampling::Nearest, f64::NAN, &mut dst, None)?;
        assert_eq!(
            dst.as_slice(),
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 2.0, 2.0, 3.0]
        );
        Ok(())
    }

    #[test]
    fn linear_shape_ratio() -> Result<(), ResampleError> {
        let src = grid_2x2();
        let mut dst = Grid::from_size_val(
            GridSize {
                width: 3,
                height: 3,
            },
            0.0,
        )
        .unwrap();
        upsample_into(&src, None, Upsampling::Linear, f64::NAN, &mut dst, None)?;
        assert_eq!(
            dst.as_slice(),
            &[0.0, 0.5, 1.0, 1.0, 1.5, 2.0, 2.0, 2.5, 3.0]
        );
        Ok(())
    }

    #[test]
    fn linear_falls_back_to_nearest_neighbor() -> Result<(), ResampleError> {
        let src = Grid::new(
            GridSize {
                width: 2,
                height: 2,
            },
            vec![0.0, f64::NAN, 2.0, 3.0],
        )
        .unwrap();
        let mut dst = Grid::from_size_val(
            GridSize {
                width: 3,
                height: 3,
            },
            0.0,
        )
        .unwrap();
        upsample_into(&src, None, Upsampling::Linear, -9.0, &mut dst, None)?;
        // corner cells with wx/wy = 0 pick the valid corner itself
        assert_eq!(dst.get(0, 0), Some(0.0));
        assert_eq!(dst.get(2, 2), Some(3.0));
        // the center has wx = wy = 0.5 and falls back to the (1, 1) neighbor
        assert_eq!(dst.get(1, 1), Some(3.0));
        // top-right corner samples the invalid cell directly
        assert_eq!(dst.get(0, 2), Some(-9.0));
        Ok(())
    }

    #[test]
    fn masked_cells_fill() -> Result<(), ResampleError> {
        let src = grid_2x2().with_mask(vec![false, true, false, false]).unwrap();
        let mask = crate::fill::source_mask(&src);
        let mut dst = Grid::from_size_val(
            GridSize {
                width: 4,
                height: 4,
            },
            0.0,
        )
        .unwrap();
        upsample_into(&src, mask, Upsampling::Nearest, -9.0, &mut dst, None)?;
        // columns 2 and 3 of the top half sample the masked cell (0, 1)
        assert_eq!(dst.get(0, 2), Some(-9.0));
        assert_eq!(dst.get(0, 3), Some(-9.0));
        assert_eq!(dst.get(0, 0), Some(0.0));
        Ok(())
    }

    #[test]
    fn shrinking_is_invalid() {
        let src = grid_2x2();
        let mut dst = Grid::from_size_val(
            GridSize {
                width: 1,
                height: 3,
            },
            0.0,
        )
        .unwrap();
        let result = upsample_into(&src, None, Upsampling::Linear, f64::NAN, &mut dst, None);
        assert!(matches!(
            result,
            Err(ResampleError::InvalidTargetSize(_, "upsampling", _))
        ));
    }
}
