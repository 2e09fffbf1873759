//! Mask and fill-value resolution.
//!
//! The kernels treat a cell as valid when its value is finite and the
//! source mask, if any, does not flag it. Wrapping the output back into a
//! masked grid is a boundary concern handled here, not in the kernels.

use gridsample_grid::{Grid, GridElement};

/// Borrowed view over a validity mask with its own row stride.
///
/// The mixed dispatch path reuses the source mask while reading from an
/// intermediate grid of a different width, so indexing must go through the
/// mask's own width rather than the grid's.
#[derive(Clone, Copy)]
pub(crate) struct MaskView<'a> {
    data: &'a [bool],
    width: usize,
}

impl<'a> MaskView<'a> {
    pub(crate) fn new(data: &'a [bool], width: usize) -> Self {
        Self { data, width }
    }

    #[inline]
    pub(crate) fn masked(&self, row: usize, col: usize) -> bool {
        self.data[row * self.width + col]
    }
}

/// Whether a cell holds valid data: finite value and not flagged by the mask.
#[inline]
pub(crate) fn is_cell_valid<T: GridElement>(
    v: T,
    mask: Option<MaskView<'_>>,
    row: usize,
    col: usize,
) -> bool {
    v.is_finite_value() && !mask.is_some_and(|m| m.masked(row, col))
}

/// The source mask, when present and non-trivial (at least one masked cell).
pub(crate) fn source_mask<T: GridElement>(src: &Grid<T>) -> Option<MaskView<'_>> {
    src.mask().and_then(|mask| {
        if mask.iter().any(|&m| m) {
            Some(MaskView::new(mask, src.width()))
        } else {
            None
        }
    })
}

/// Resolve the fill value: explicit argument, then the source grid's
/// configured fill (if masked), then the output buffer's (if masked), then
/// the element type's conventional default.
pub(crate) fn resolve_fill<T: GridElement>(
    explicit: Option<T>,
    src: &Grid<T>,
    out: Option<&Grid<T>>,
) -> T {
    explicit
        .or_else(|| if src.is_masked() { src.fill_value() } else { None })
        .or_else(|| out.and_then(|g| if g.is_masked() { g.fill_value() } else { None }))
        .unwrap_or_else(T::no_data)
}

/// If the source was a masked grid, derive the output's mask from the fill
/// value: cells equal to a finite fill, or non-finite cells when the fill is
/// non-finite, become masked.
pub(crate) fn mask_output<T: GridElement>(out: &mut Grid<T>, src: &Grid<T>, fill_value: T) {
    if !src.is_masked() {
        return;
    }
    let mask = if fill_value.is_finite_value() {
        out.as_slice().iter().map(|&v| v == fill_value).collect()
    } else {
        out.as_slice()
            .iter()
            .map(|&v| !v.is_finite_value())
            .collect()
    };
    // length always matches, the mask is derived from the buffer itself
    let _ = out.set_mask(mask);
    out.set_fill_value(fill_value);
}
