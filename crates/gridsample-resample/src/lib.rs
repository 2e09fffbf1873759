#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// resampling error types.
pub mod error;

/// downsampling (aggregation) kernel.
mod downsample;

/// mask and fill-value resolution.
mod fill;

/// interpolation and aggregation method tags.
pub mod methods;

/// transform reconciliation.
mod reconcile;

/// resampling entry points and shape dispatch.
pub mod resample;

/// upsampling (interpolation) kernel.
mod upsample;

pub use crate::error::ResampleError;
pub use crate::methods::{Downsampling, Upsampling};
pub use crate::resample::{
    downsample_2d, downsample_2d_into, resample_2d, resample_2d_into, upsample_2d,
    upsample_2d_into, ResampleOptions,
};
