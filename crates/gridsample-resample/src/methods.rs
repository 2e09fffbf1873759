//! Method tags for the resampling kernels.
//!
//! Each direction has its own closed enum so that a downsampling tag can
//! never reach the upsampling kernel and vice versa.

/// Interpolation method for upsampling a grid to a higher resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Upsampling {
    /// Take the nearest source grid cell.
    Nearest,
    /// Bi-linear interpolation between the 4 nearest source grid cells,
    /// sampled at the top-left corner of the destination cell footprint.
    #[default]
    Linear,
    /// Bi-linear interpolation sampled at the midpoint of the destination
    /// cell footprint.
    LinearMidpoint,
}

/// Aggregation method for downsampling a grid to a lower resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Downsampling {
    /// Take the first valid source grid cell, ignoring contribution areas.
    First,
    /// Take the last valid source grid cell, ignoring contribution areas.
    Last,
    /// Average of all valid source grid cells, weighted by contribution area.
    #[default]
    Mean,
    /// Most frequently seen valid value, with frequency given by contribution
    /// area. The rank of the frequency is selected by `mode_rank`.
    Mode,
    /// Biased weighted estimator of variance, weighted by contribution area.
    Var,
    /// Standard deviation corresponding to the biased weighted estimator of
    /// variance.
    Std,
}
