use gridsample_grid::{AffineTransform, GridSize};

use crate::error::ResampleError;

/// Which directional cellsize rule applies when reconciling transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Output pixels must not be larger than source pixels.
    Up,
    /// Output pixels must not be smaller than source pixels.
    Down,
}

/// Per-axis mapping from output cell indices into fractional source cell
/// indices, derived from a validated transform pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScaleOffset {
    pub scale_x: f64,
    pub scale_y: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl ScaleOffset {
    /// Whether the mapping is one-to-one with no shift. Matching transforms
    /// produce exactly these values, so strict comparison is intended.
    pub(crate) fn is_identity(self) -> bool {
        self.scale_x == 1.0 && self.scale_y == 1.0 && self.x_offset == 0.0 && self.y_offset == 0.0
    }
}

/// Validate a transform pair and derive the scale/offset mapping.
///
/// Returns `None` when neither transform is given (shape-ratio scaling
/// applies), the mapping when both are given and compatible, and an error
/// otherwise. Checks run in a fixed order: pairing, rotation, pixel-size
/// signs per axis, coverage per axis, then the directional cellsize rule.
pub(crate) fn reconcile(
    src_transform: Option<&AffineTransform>,
    out_transform: Option<&AffineTransform>,
    src_size: GridSize,
    out_size: GridSize,
    direction: Direction,
) -> Result<Option<ScaleOffset>, ResampleError> {
    let (src_t, out_t) = match (src_transform, out_transform) {
        (None, None) => return Ok(None),
        (Some(s), Some(o)) => (s, o),
        _ => return Err(ResampleError::TransformPairing),
    };

    if !src_t.is_axis_aligned() || !out_t.is_axis_aligned() {
        return Err(ResampleError::RotatedTransform);
    }
    if src_t.dx * out_t.dx < 0.0 {
        return Err(ResampleError::IncompatiblePixelSign("widths"));
    }
    if src_t.dy * out_t.dy < 0.0 {
        return Err(ResampleError::IncompatiblePixelSign("heights"));
    }

    // far edges of the covered extents, sign-aware
    let src_xcov1 = src_t.x0 + src_size.width as f64 * src_t.dx;
    let out_xcov1 = out_t.x0 + out_size.width as f64 * out_t.dx;
    let src_ycov1 = src_t.y0 + src_size.height as f64 * src_t.dy;
    let out_ycov1 = out_t.y0 + out_size.height as f64 * out_t.dy;

    if (out_xcov1 - src_xcov1) * src_t.dx > 0.0 || (out_t.x0 - src_t.x0) * src_t.dx < 0.0 {
        return Err(ResampleError::CoverageOutsideSource("x"));
    }
    if (out_ycov1 - src_ycov1) * src_t.dy > 0.0 || (out_t.y0 - src_t.y0) * src_t.dy < 0.0 {
        return Err(ResampleError::CoverageOutsideSource("y"));
    }

    match direction {
        Direction::Up => {
            if out_t.dx.abs() > src_t.dx.abs() || out_t.dy.abs() > src_t.dy.abs() {
                return Err(ResampleError::InvalidCellsize("upsampling"));
            }
        }
        Direction::Down => {
            if out_t.dx.abs() < src_t.dx.abs() || out_t.dy.abs() < src_t.dy.abs() {
                return Err(ResampleError::InvalidCellsize("downsampling"));
            }
        }
    }

    Ok(Some(ScaleOffset {
        scale_x: out_t.dx / src_t.dx,
        scale_y: out_t.dy / src_t.dy,
        x_offset: (out_t.x0 - src_t.x0) / src_t.dx,
        y_offset: (out_t.y0 - src_t.y0) / src_t.dy,
    }))
}
