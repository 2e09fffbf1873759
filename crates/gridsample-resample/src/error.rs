use gridsample_grid::{GridError, GridSize};

/// An error type for the resampling operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ResampleError {
    /// The caller-supplied output buffer disagrees with the requested target shape.
    #[error("Output buffer size ({0}) does not match the requested target size ({1})")]
    ShapeMismatch(GridSize, GridSize),

    /// Exactly one of the source and output transforms was supplied.
    #[error("Either no transform should be given, or both")]
    TransformPairing,

    /// A transform carries a nonzero rotation term.
    #[error("Resampling rotated grids is not supported")]
    RotatedTransform,

    /// Pixel-size signs disagree between source and output on an axis.
    #[error("Incompatible transforms: pixel {0} must have the same sign")]
    IncompatiblePixelSign(&'static str),

    /// The output pixel size contradicts the requested direction.
    #[error("Invalid cellsize in output transform for {0}")]
    InvalidCellsize(&'static str),

    /// The output coordinate extent is not contained in the source extent.
    #[error("Invalid target coverage: output {0} outside of source")]
    CoverageOutsideSource(&'static str),

    /// The shape-ratio path requested growth from a downsample or shrink
    /// from an upsample.
    #[error("Invalid target size ({0}) for {1} from source size ({2})")]
    InvalidTargetSize(GridSize, &'static str, GridSize),

    /// Mode aggregation requested with a rank below one.
    #[error("mode_rank must be >= 1, got {0}")]
    InvalidModeRank(usize),

    /// An error from the grid container.
    #[error(transparent)]
    Grid(#[from] GridError),
}
