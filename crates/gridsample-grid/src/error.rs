/// An error type for the grid module.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Error when the data length does not match the grid size.
    #[error("Data length ({0}) does not match the grid size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the mask length does not match the grid size.
    #[error("Mask length ({0}) does not match the grid size ({1})")]
    InvalidMaskLength(usize, usize),

    /// Error when a grid dimension is zero.
    #[error("Grid dimensions must be non-zero, got {0}x{1}")]
    ZeroSize(usize, usize),
}
