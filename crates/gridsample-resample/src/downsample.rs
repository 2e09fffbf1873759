//! Downsampling kernel: shrink a grid by weighted-area aggregation.
//!
//! Every output cell aggregates the source cells covered by its footprint,
//! with fractional weights on the first and last covered row/column.

use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};

use gridsample_grid::{Grid, GridElement};

use crate::error::ResampleError;
use crate::fill::{is_cell_valid, MaskView};
use crate::methods::Downsampling;
use crate::reconcile::ScaleOffset;

const EPS: f64 = 1e-10;

/// Integer cell bounds and partial-overlap edge weights of a footprint
/// interval `[f0, f1)` on one axis. An edge weight within `EPS` of the next
/// integer snaps to one and the bound retracts, avoiding a degenerate
/// zero-weight slice.
#[inline]
fn weighted_bounds(f0: f64, f1: f64, last: usize) -> (usize, usize, f64, f64) {
    let i0 = (f0 as usize).min(last);
    let mut i1 = (f1 as usize).min(last);
    let w0 = 1.0 - (f0 - i0 as f64);
    let mut w1 = f1 - i1 as f64;
    if w1 < EPS {
        w1 = 1.0;
        if i1 > i0 {
            i1 -= 1;
        }
    }
    (i0, i1, w0, w1)
}

/// Integer cell bounds of a footprint for the unweighted First/Last scan;
/// an exactly-integer upper edge retracts by one.
#[inline]
fn scan_bounds(f0: f64, f1: f64, last: usize) -> (usize, usize) {
    let i0 = (f0 as usize).min(last);
    let mut i1 = (f1 as usize).min(last);
    if i1 as f64 == f1 && i1 > i0 {
        i1 -= 1;
    }
    (i0, i1)
}

#[inline]
fn edge_weight(i: usize, i0: usize, i1: usize, w0: f64, w1: f64) -> f64 {
    if i == i0 {
        w0
    } else if i == i1 {
        w1
    } else {
        1.0
    }
}

/// Downsample `src` into `dst`.
///
/// Without a scale/offset mapping the scaling is derived from the shape
/// ratio; an equal target shape copies the source and a larger target on
/// either axis is an error, since this kernel only shrinks.
pub(crate) fn downsample_into<T: GridElement>(
    src: &Grid<T>,
    mask: Option<MaskView<'_>>,
    method: Downsampling,
    fill_value: T,
    mode_rank: usize,
    dst: &mut Grid<T>,
    geo: Option<ScaleOffset>,
) -> Result<(), ResampleError> {
    if method == Downsampling::Mode && mode_rank < 1 {
        return Err(ResampleError::InvalidModeRank(mode_rank));
    }

    let src_w = src.width();
    let src_h = src.height();
    let out_w = dst.width();
    let out_h = dst.height();

    if geo.is_none() {
        if src.size() == dst.size() {
            dst.as_slice_mut().copy_from_slice(src.as_slice());
            return Ok(());
        }
        if out_w > src_w || out_h > src_h {
            return Err(ResampleError::InvalidTargetSize(
                dst.size(),
                "downsampling",
                src.size(),
            ));
        }
    }

    let (scale_x, scale_y, x_offset, y_offset) = match geo {
        Some(g) => (g.scale_x, g.scale_y, g.x_offset, g.y_offset),
        None => (
            src_w as f64 / out_w as f64,
            src_h as f64 / out_h as f64,
            0.0,
            0.0,
        ),
    };

    let src_data = src.as_slice();

    match method {
        Downsampling::First | Downsampling::Last => {
            let first = method == Downsampling::First;
            dst.as_slice_mut()
                .par_chunks_exact_mut(out_w)
                .enumerate()
                .for_each(|(out_y, row)| {
                    let src_yf0 = y_offset + scale_y * out_y as f64;
                    let (src_y0, src_y1) = scan_bounds(src_yf0, src_yf0 + scale_y, src_h - 1);
                    for (out_x, cell) in row.iter_mut().enumerate() {
                        let src_xf0 = x_offset + scale_x * out_x as f64;
                        let (src_x0, src_x1) = scan_bounds(src_xf0, src_xf0 + scale_x, src_w - 1);
                        let mut value = fill_value;
                        'scan: for src_y in src_y0..=src_y1 {
                            for src_x in src_x0..=src_x1 {
                                let v = src_data[src_y * src_w + src_x];
                                if is_cell_valid(v, mask, src_y, src_x) {
                                    value = v;
                                    if first {
                                        break 'scan;
                                    }
                                }
                            }
                        }
                        *cell = value;
                    }
                });
        }

        Downsampling::Mean => {
            dst.as_slice_mut()
                .par_chunks_exact_mut(out_w)
                .enumerate()
                .for_each(|(out_y, row)| {
                    let src_yf0 = y_offset + scale_y * out_y as f64;
                    let (src_y0, src_y1, wy0, wy1) =
                        weighted_bounds(src_yf0, src_yf0 + scale_y, src_h - 1);
                    for (out_x, cell) in row.iter_mut().enumerate() {
                        let src_xf0 = x_offset + scale_x * out_x as f64;
                        let (src_x0, src_x1, wx0, wx1) =
                            weighted_bounds(src_xf0, src_xf0 + scale_x, src_w - 1);
                        let mut v_sum = 0.0;
                        let mut w_sum = 0.0;
                        for src_y in src_y0..=src_y1 {
                            let wy = edge_weight(src_y, src_y0, src_y1, wy0, wy1);
                            for src_x in src_x0..=src_x1 {
                                let wx = edge_weight(src_x, src_x0, src_x1, wx0, wx1);
                                let v = src_data[src_y * src_w + src_x];
                                if is_cell_valid(v, mask, src_y, src_x) {
                                    let w = wx * wy;
                                    v_sum += w * v.to_f64_lossy();
                                    w_sum += w;
                                }
                            }
                        }
                        *cell = if w_sum < EPS {
                            fill_value
                        } else {
                            T::from_f64_lossy(v_sum / w_sum)
                        };
                    }
                });
        }

        Downsampling::Var | Downsampling::Std => {
            let std = method == Downsampling::Std;
            dst.as_slice_mut()
                .par_chunks_exact_mut(out_w)
                .enumerate()
                .for_each(|(out_y, row)| {
                    let src_yf0 = y_offset + scale_y * out_y as f64;
                    let (src_y0, src_y1, wy0, wy1) =
                        weighted_bounds(src_yf0, src_yf0 + scale_y, src_h - 1);
                    for (out_x, cell) in row.iter_mut().enumerate() {
                        let src_xf0 = x_offset + scale_x * out_x as f64;
                        let (src_x0, src_x1, wx0, wx1) =
                            weighted_bounds(src_xf0, src_xf0 + scale_x, src_w - 1);
                        let mut w_sum = 0.0;
                        let mut wv_sum = 0.0;
                        let mut wvv_sum = 0.0;
                        for src_y in src_y0..=src_y1 {
                            let wy = edge_weight(src_y, src_y0, src_y1, wy0, wy1);
                            for src_x in src_x0..=src_x1 {
                                let wx = edge_weight(src_x, src_x0, src_x1, wx0, wx1);
                                let v = src_data[src_y * src_w + src_x];
                                if is_cell_valid(v, mask, src_y, src_x) {
                                    let w = wx * wy;
                                    let v = v.to_f64_lossy();
                                    w_sum += w;
                                    wv_sum += w * v;
                                    wvv_sum += w * v * v;
                                }
                            }
                        }
                        *cell = if w_sum < EPS {
                            fill_value
                        } else {
                            // biased weighted estimator of variance
                            let var = (wvv_sum * w_sum - wv_sum * wv_sum) / w_sum / w_sum;
                            T::from_f64_lossy(if std { var.sqrt() } else { var })
                        };
                    }
                });
        }

        Downsampling::Mode => {
            // upper bound on distinct values a footprint can cover
            let max_value_count = (scale_x as usize + 2) * (scale_y as usize + 2);
            let rank_reachable = mode_rank <= max_value_count;
            dst.as_slice_mut()
                .par_chunks_exact_mut(out_w)
                .enumerate()
                .for_each(|(out_y, row)| {
                    let mut values = vec![T::default(); max_value_count];
                    let mut weights = vec![0.0f64; max_value_count];
                    let mut top = vec![(-1.0f64, 0usize); if rank_reachable { mode_rank } else { 0 }];
                    let src_yf0 = y_offset + scale_y * out_y as f64;
                    let (src_y0, src_y1, wy0, wy1) =
                        weighted_bounds(src_yf0, src_yf0 + scale_y, src_h - 1);
                    for (out_x, cell) in row.iter_mut().enumerate() {
                        let src_xf0 = x_offset + scale_x * out_x as f64;
                        let (src_x0, src_x1, wx0, wx1) =
                            weighted_bounds(src_xf0, src_xf0 + scale_x, src_w - 1);
                        let mut value_count = 0usize;
                        for src_y in src_y0..=src_y1 {
                            let wy = edge_weight(src_y, src_y0, src_y1, wy0, wy1);
                            for src_x in src_x0..=src_x1 {
                                let wx = edge_weight(src_x, src_x0, src_x1, wx0, wx1);
                                let v = src_data[src_y * src_w + src_x];
                                if is_cell_valid(v, mask, src_y, src_x) {
                                    let w = wx * wy;
                                    match values[..value_count].iter().position(|&u| u == v) {
                                        Some(i) => weights[i] += w,
                                        None => {
                                            values[value_count] = v;
                                            weights[value_count] = w;
                                            value_count += 1;
                                        }
                                    }
                                }
                            }
                        }

                        let mut value = fill_value;
                        if rank_reachable {
                            // top-k selection; strict ordering keeps the first
                            // value encountered in scan order on exact ties
                            for slot in top.iter_mut() {
                                *slot = (-1.0, 0);
                            }
                            for i in 0..value_count {
                                let w = weights[i];
                                let mut j = mode_rank;
                                while j > 0 && w > top[j - 1].0 {
                                    j -= 1;
                                }
                                if j < mode_rank {
                                    for k in ((j + 1)..mode_rank).rev() {
                                        top[k] = top[k - 1];
                                    }
                                    top[j] = (w, i);
                                }
                            }
                            let (w_rank, idx) = top[mode_rank - 1];
                            if w_rank > 0.0 {
                                value = values[idx];
                            }
                        }
                        *cell = value;
                    }
                });
        }
    }

    Ok(())
}
