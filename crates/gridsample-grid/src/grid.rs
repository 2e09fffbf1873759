use crate::error::GridError;

/// Grid size in cells
///
/// A struct to represent the size of a 2-D grid in cells.
///
/// # Examples
///
/// ```
/// use gridsample_grid::GridSize;
///
/// let grid_size = GridSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(grid_size.width, 10);
/// assert_eq!(grid_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    /// Width of the grid in cells
    pub width: usize,
    /// Height of the grid in cells
    pub height: usize,
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "GridSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for GridSize {
    fn from(size: [usize; 2]) -> Self {
        GridSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for grid element types.
///
/// Send and Sync are required so the kernels can process output rows in
/// parallel. Non-finite float values denote "no data"; integer elements are
/// always finite.
pub trait GridElement:
    Copy + PartialEq + Default + Send + Sync + num_traits::NumCast + num_traits::ToPrimitive
{
    /// Whether the raw value carries data. Non-finite floats do not.
    fn is_finite_value(self) -> bool;

    /// Conventional no-data value for the element type.
    fn no_data() -> Self;

    /// Lossy conversion from an f64 accumulator result.
    fn from_f64_lossy(v: f64) -> Self;

    /// Lossy conversion into f64 for accumulation.
    fn to_f64_lossy(self) -> f64;
}

impl GridElement for f32 {
    fn is_finite_value(self) -> bool {
        self.is_finite()
    }

    fn no_data() -> Self {
        f32::NAN
    }

    fn from_f64_lossy(v: f64) -> Self {
        v as f32
    }

    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}

impl GridElement for f64 {
    fn is_finite_value(self) -> bool {
        self.is_finite()
    }

    fn no_data() -> Self {
        f64::NAN
    }

    fn from_f64_lossy(v: f64) -> Self {
        v
    }

    fn to_f64_lossy(self) -> f64 {
        self
    }
}

macro_rules! impl_grid_element_int {
    ($($t:ty),*) => {
        $(impl GridElement for $t {
            fn is_finite_value(self) -> bool {
                true
            }

            fn no_data() -> Self {
                <$t>::MAX
            }

            fn from_f64_lossy(v: f64) -> Self {
                v as $t
            }

            fn to_f64_lossy(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_grid_element_int!(u8, u16, u32, i16, i32, i64);

/// Represents a dense 2-D raster grid.
///
/// The grid is a flat row-major buffer of shape (H, W) with an optional
/// validity mask of the same shape (`true` marks a cell invalid regardless of
/// its numeric value) and an optional configured fill value for no-data
/// cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T: GridElement> {
    size: GridSize,
    data: Vec<T>,
    mask: Option<Vec<bool>>,
    fill_value: Option<T>,
}

impl<T: GridElement> Grid<T> {
    /// Create a new grid from cell data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the grid in cells.
    /// * `data` - The cell data in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the grid size, or the size is
    /// zero on either axis, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridsample_grid::{Grid, GridSize};
    ///
    /// let grid = Grid::<f32>::new(
    ///     GridSize {
    ///         width: 2,
    ///         height: 2,
    ///     },
    ///     vec![0.0, 1.0, 2.0, 3.0],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(grid.size().width, 2);
    /// assert_eq!(grid.size().height, 2);
    /// ```
    pub fn new(size: GridSize, data: Vec<T>) -> Result<Self, GridError> {
        if size.width == 0 || size.height == 0 {
            return Err(GridError::ZeroSize(size.width, size.height));
        }
        if data.len() != size.width * size.height {
            return Err(GridError::InvalidDataLength(
                data.len(),
                size.width * size.height,
            ));
        }

        Ok(Self {
            size,
            data,
            mask: None,
            fill_value: None,
        })
    }

    /// Create a new grid with the given size and a constant cell value.
    pub fn from_size_val(size: GridSize, val: T) -> Result<Self, GridError> {
        let data = vec![val; size.width * size.height];
        Grid::new(size, data)
    }

    /// Attach a validity mask; `true` marks a cell as invalid.
    ///
    /// # Errors
    ///
    /// If the mask length does not match the grid size, an error is returned.
    pub fn with_mask(mut self, mask: Vec<bool>) -> Result<Self, GridError> {
        if mask.len() != self.data.len() {
            return Err(GridError::InvalidMaskLength(mask.len(), self.data.len()));
        }
        self.mask = Some(mask);
        Ok(self)
    }

    /// Configure the fill value substituted for no-data cells.
    pub fn with_fill_value(mut self, fill_value: T) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    /// Replace the validity mask; `true` marks a cell as invalid.
    ///
    /// # Errors
    ///
    /// If the mask length does not match the grid size, an error is returned.
    pub fn set_mask(&mut self, mask: Vec<bool>) -> Result<(), GridError> {
        if mask.len() != self.data.len() {
            return Err(GridError::InvalidMaskLength(mask.len(), self.data.len()));
        }
        self.mask = Some(mask);
        Ok(())
    }

    /// Set the configured fill value.
    pub fn set_fill_value(&mut self, fill_value: T) {
        self.fill_value = Some(fill_value);
    }

    /// The size of the grid in cells.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The width of the grid in cells.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the grid in cells.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The grid data as a row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The grid data as a mutable row-major slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The validity mask, if one is attached.
    pub fn mask(&self) -> Option<&[bool]> {
        self.mask.as_deref()
    }

    /// Whether the grid carries a validity mask.
    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    /// The configured fill value, if one is set.
    pub fn fill_value(&self) -> Option<T> {
        self.fill_value
    }

    /// Get the value at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.size.height || col >= self.size.width {
            return None;
        }
        Some(self.data[row * self.size.width + col])
    }

    /// Whether the cell at `(row, col)` holds valid data: the value is
    /// finite and the cell is not masked.
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        let idx = row * self.size.width + col;
        self.data[idx].is_finite_value()
            && !self.mask.as_ref().is_some_and(|m| m[idx])
    }
}
