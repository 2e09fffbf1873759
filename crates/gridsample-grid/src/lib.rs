#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// grid error types.
pub mod error;

/// the 2-D grid container and element traits.
pub mod grid;

/// axis-aligned affine pixel-to-coordinate transforms.
pub mod transform;

pub use crate::error::GridError;
pub use crate::grid::{Grid, GridElement, GridSize};
pub use crate::transform::AffineTransform;
