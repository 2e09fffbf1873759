/// Axis-aligned affine transform mapping cell indices to coordinates.
///
/// The six coefficients map a cell `(row, col)` to world coordinates as
/// `X = x0 + col * dx + row * xrot` and `Y = y0 + col * yrot + row * dy`.
/// Resampling only supports axis-aligned grids, so `xrot` and `yrot` must be
/// zero wherever a transform is consumed.
///
/// # Examples
///
/// ```
/// use gridsample_grid::AffineTransform;
///
/// // one-degree cells anchored at (0, 4), north up
/// let transform = AffineTransform::from([1.0, 0.0, 0.0, 0.0, -1.0, 4.0]);
/// assert_eq!(transform.dx, 1.0);
/// assert_eq!(transform.dy, -1.0);
/// assert!(transform.is_axis_aligned());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    /// Width of a cell in world units.
    pub dx: f64,
    /// Row rotation term (must be zero).
    pub xrot: f64,
    /// X coordinate of the upper-left corner of cell (0, 0).
    pub x0: f64,
    /// Column rotation term (must be zero).
    pub yrot: f64,
    /// Height of a cell in world units (negative for north-up grids).
    pub dy: f64,
    /// Y coordinate of the upper-left corner of cell (0, 0).
    pub y0: f64,
}

impl AffineTransform {
    /// Create a transform from its six coefficients in GDAL-style order
    /// `(dx, xrot, x0, yrot, dy, y0)`.
    pub fn new(dx: f64, xrot: f64, x0: f64, yrot: f64, dy: f64, y0: f64) -> Self {
        Self {
            dx,
            xrot,
            x0,
            yrot,
            dy,
            y0,
        }
    }

    /// Whether both rotation terms are zero.
    pub fn is_axis_aligned(&self) -> bool {
        self.xrot == 0.0 && self.yrot == 0.0
    }
}

impl From<[f64; 6]> for AffineTransform {
    fn from(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }
}

impl From<(f64, f64, f64, f64, f64, f64)> for AffineTransform {
    fn from(c: (f64, f64, f64, f64, f64, f64)) -> Self {
        Self::new(c.0, c.1, c.2, c.3, c.4, c.5)
    }
}
